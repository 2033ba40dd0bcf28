//! Hub and spoke coordinates plus the derived distance matrix.
//!
//! Coordinates are abstract map units (the renderer uses pixels). The
//! targeting engine only needs relative distances, which it normalises
//! against [`Geometry::p90_distance`]: the 90th-percentile entry of every
//! directed hub-spoke and spoke-spoke distance.

use cargosim_types::{Location, SPOKE_COUNT, SpokeIdx};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Default map center for the ring layout.
pub const DEFAULT_CENTER: Point = Point { x: 500.0, y: 400.0 };

/// Default ring radius for the ring layout.
pub const DEFAULT_RADIUS: f64 = 350.0;

/// Inset between the ring radius and the spoke markers.
const RING_INSET: f64 = 20.0;

/// A 2-D map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Positions of the hub and every spoke, with precomputed distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    hub: Point,
    spokes: Vec<Point>,
    hub_distance: Vec<f64>,
    spoke_distance: Vec<Vec<f64>>,
}

impl Geometry {
    /// Build a geometry from explicit coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::GeometrySpokeCount`] unless exactly
    /// [`SPOKE_COUNT`] spoke positions are given, and
    /// [`WorldError::NonFiniteCoordinate`] for NaN or infinite coordinates.
    pub fn new(hub: Point, spokes: Vec<Point>) -> Result<Self, WorldError> {
        if spokes.len() != SPOKE_COUNT {
            return Err(WorldError::GeometrySpokeCount {
                found: spokes.len(),
            });
        }
        if let Some(bad) = core::iter::once(&hub)
            .chain(spokes.iter())
            .find(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(WorldError::NonFiniteCoordinate { x: bad.x, y: bad.y });
        }

        let hub_distance = spokes.iter().map(|p| hub.distance_to(*p)).collect();
        let spoke_distance = spokes
            .iter()
            .map(|from| spokes.iter().map(|to| from.distance_to(*to)).collect())
            .collect();
        Ok(Self {
            hub,
            spokes,
            hub_distance,
            spoke_distance,
        })
    }

    /// Spokes evenly spaced on a circle around the hub, starting at angle
    /// zero and proceeding counter-clockwise in index order. Coordinates
    /// are truncated to whole units to match the renderer's layout.
    pub fn ring(center: Point, radius: f64) -> Self {
        let r = radius - RING_INSET;
        #[allow(clippy::cast_precision_loss)]
        let spokes: Vec<Point> = (0..SPOKE_COUNT)
            .map(|idx| {
                let theta = core::f64::consts::TAU * idx as f64 / SPOKE_COUNT as f64;
                Point::new(
                    r.mul_add(theta.cos(), center.x).trunc(),
                    r.mul_add(theta.sin(), center.y).trunc(),
                )
            })
            .collect();
        let hub_distance = spokes.iter().map(|p| center.distance_to(*p)).collect();
        let spoke_distance = spokes
            .iter()
            .map(|from| spokes.iter().map(|to| from.distance_to(*to)).collect())
            .collect();
        Self {
            hub: center,
            spokes,
            hub_distance,
            spoke_distance,
        }
    }

    /// Hub position.
    pub const fn hub(&self) -> Point {
        self.hub
    }

    /// Spoke positions in index order.
    pub fn spokes(&self) -> &[Point] {
        &self.spokes
    }

    /// Travel distance from `from` to spoke `to`. Zero when already there.
    pub fn distance(&self, from: Location, to: SpokeIdx) -> f64 {
        match from {
            Location::Hub => self.hub_distance.get(to.index()).copied().unwrap_or(0.0),
            Location::Spoke(origin) if origin == to => 0.0,
            Location::Spoke(origin) => self
                .spoke_distance
                .get(origin.index())
                .and_then(|row| row.get(to.index()))
                .copied()
                .unwrap_or(0.0),
        }
    }

    /// 90th-percentile distance across every directed hub-spoke and
    /// distinct spoke-spoke leg. Falls back to `1.0` for a degenerate map.
    pub fn p90_distance(&self) -> f64 {
        let mut all: Vec<f64> = self
            .hub_distance
            .iter()
            .flat_map(|d| [*d, *d])
            .collect();
        for (i, row) in self.spoke_distance.iter().enumerate() {
            for (j, d) in row.iter().enumerate() {
                if i != j {
                    all.push(*d);
                }
            }
        }
        all.sort_by(f64::total_cmp);
        let idx = all.len().saturating_mul(9) / 10;
        match all.get(idx).copied() {
            Some(d) if d > 0.0 => d,
            _ => 1.0,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::ring(DEFAULT_CENTER, DEFAULT_RADIUS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn spoke(i: usize) -> SpokeIdx {
        SpokeIdx::new(i).unwrap()
    }

    fn line_geometry() -> Geometry {
        let spokes = (0..SPOKE_COUNT)
            .map(|i| Point::new(10.0 * f64::from(u32::try_from(i).unwrap() + 1), 0.0))
            .collect();
        Geometry::new(Point::new(0.0, 0.0), spokes).unwrap()
    }

    #[test]
    fn distances_from_hub_and_between_spokes() {
        let geo = line_geometry();
        assert!((geo.distance(Location::Hub, spoke(0)) - 10.0).abs() < 1e-9);
        assert!((geo.distance(Location::Spoke(spoke(0)), spoke(3)) - 30.0).abs() < 1e-9);
        assert!(geo.distance(Location::Spoke(spoke(4)), spoke(4)).abs() < 1e-9);
    }

    #[test]
    fn ring_spokes_are_equidistant_from_hub() {
        let geo = Geometry::default();
        let first = geo.distance(Location::Hub, spoke(0));
        for idx in SpokeIdx::all() {
            // Truncation to whole units shifts each point by under one unit.
            assert!((geo.distance(Location::Hub, idx) - first).abs() < 2.0);
        }
        assert!((first - (DEFAULT_RADIUS - RING_INSET)).abs() < 1e-9);
    }

    #[test]
    fn p90_uses_the_ninetieth_percentile() {
        let geo = line_geometry();
        let p90 = geo.p90_distance();
        // 110 directed legs; index 99 of the sorted list.
        assert!(p90 > 60.0 && p90 <= 100.0);
    }

    #[test]
    fn wrong_spoke_count_is_rejected() {
        let err = Geometry::new(Point::new(0.0, 0.0), vec![Point::new(1.0, 1.0)]);
        assert_eq!(err, Err(WorldError::GeometrySpokeCount { found: 1 }));
    }
}
