//! Cadence-driven draw-down of resident stock.
//!
//! Consumption only fires on PM (odd) periods. For a resource with a
//! cadence of `k` days, one unit is consumed when `day % k == k - 1`,
//! where `day = period / 2`. Resources are processed in `A, B, C, D`
//! order, and a spoke is only drawn down while it currently holds both A
//! and B. Because the A/B check is re-evaluated after each resource, a
//! spoke whose last unit of A is consumed skips the B, C, and D draws in
//! that same period.

use cargosim_types::{Resource, SPOKE_COUNT};
use serde::Deserialize;
use tracing::debug;

use crate::network::SpokeNetwork;

/// Days each unit of a resource lasts at a spoke.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsumptionConfig {
    /// Days per unit of A (default: 2).
    #[serde(default = "default_a_days")]
    pub a_days: u32,

    /// Days per unit of B (default: 2).
    #[serde(default = "default_b_days")]
    pub b_days: u32,

    /// Days per unit of C (default: 3).
    #[serde(default = "default_c_days")]
    pub c_days: u32,

    /// Days per unit of D (default: 4).
    #[serde(default = "default_d_days")]
    pub d_days: u32,
}

impl ConsumptionConfig {
    /// Cadence in days for a resource.
    pub const fn days(&self, resource: Resource) -> u32 {
        match resource {
            Resource::A => self.a_days,
            Resource::B => self.b_days,
            Resource::C => self.c_days,
            Resource::D => self.d_days,
        }
    }
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            a_days: default_a_days(),
            b_days: default_b_days(),
            c_days: default_c_days(),
            d_days: default_d_days(),
        }
    }
}

const fn default_a_days() -> u32 {
    2
}

const fn default_b_days() -> u32 {
    2
}

const fn default_c_days() -> u32 {
    3
}

const fn default_d_days() -> u32 {
    4
}

/// What a consumption pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumptionReport {
    /// Resources whose cadence fired this period, in processing order.
    pub fired: Vec<Resource>,
    /// Number of spoke-resource draws applied.
    pub draws: u32,
}

/// Applies periodic consumption to a [`SpokeNetwork`].
#[derive(Debug, Clone)]
pub struct ConsumptionEngine {
    cadence: ConsumptionConfig,
}

impl ConsumptionEngine {
    /// Create an engine for the given cadences.
    pub const fn new(cadence: ConsumptionConfig) -> Self {
        Self { cadence }
    }

    /// The configured cadences.
    pub const fn cadence(&self) -> &ConsumptionConfig {
        &self.cadence
    }

    /// Whether `resource` is consumed during `period`.
    ///
    /// A zero cadence never fires.
    pub fn is_due(&self, resource: Resource, period: u64) -> bool {
        if period % 2 == 0 {
            return false;
        }
        let day = period / 2;
        let days = u64::from(self.cadence.days(resource));
        day.checked_rem(days)
            .is_some_and(|phase| phase == days.saturating_sub(1))
    }

    /// Apply this period's consumption to the network.
    pub fn apply(&self, network: &mut SpokeNetwork, period: u64) -> ConsumptionReport {
        let mut report = ConsumptionReport::default();
        for resource in Resource::ALL {
            if !self.is_due(resource, period) {
                continue;
            }
            report.fired.push(resource);
            for stock in network.stock_mut() {
                if stock.has_baseline() {
                    stock.draw_one(resource);
                    report.draws = report.draws.saturating_add(1);
                }
            }
        }
        if !report.fired.is_empty() {
            debug!(
                period,
                fired = ?report.fired,
                draws = report.draws,
                spokes = SPOKE_COUNT,
                "Consumption applied"
            );
        }
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cargosim_types::{ResourceVec, SpokeIdx};

    use super::*;

    fn engine() -> ConsumptionEngine {
        ConsumptionEngine::new(ConsumptionConfig::default())
    }

    #[test]
    fn never_fires_on_am_periods() {
        let engine = engine();
        for period in (0..40).step_by(2) {
            for resource in Resource::ALL {
                assert!(!engine.is_due(resource, period));
            }
        }
    }

    #[test]
    fn cadence_matches_day_modulus() {
        let engine = engine();
        // Period 3 is day 1: A and B (k=2) are due, C (k=3) and D (k=4) are not.
        assert!(engine.is_due(Resource::A, 3));
        assert!(engine.is_due(Resource::B, 3));
        assert!(!engine.is_due(Resource::C, 3));
        // Period 5 is day 2: C is due.
        assert!(engine.is_due(Resource::C, 5));
        // Period 7 is day 3: D is due.
        assert!(engine.is_due(Resource::D, 7));
        assert!(!engine.is_due(Resource::A, 1));
    }

    #[test]
    fn only_spokes_with_a_and_b_are_drawn() {
        let engine = engine();
        let mut net = SpokeNetwork::new(ResourceVec::new(2.0, 2.0, 1.0, 1.0));
        let bare = SpokeIdx::new(5).unwrap();
        net.set_stock(bare, ResourceVec::new(0.0, 3.0, 3.0, 3.0));

        let report = engine.apply(&mut net, 3);
        assert_eq!(report.fired, vec![Resource::A, Resource::B]);
        assert_eq!(net.stock(SpokeIdx::new(0).unwrap()), ResourceVec::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(net.stock(bare), ResourceVec::new(0.0, 3.0, 3.0, 3.0));
    }

    #[test]
    fn last_unit_of_a_blocks_later_draws() {
        let engine = engine();
        let mut net = SpokeNetwork::new(ResourceVec::new(1.0, 2.0, 1.0, 1.0));
        let _ = engine.apply(&mut net, 3);
        // A drops to zero first, so B is no longer drawn this period.
        assert_eq!(net.stock(SpokeIdx::new(0).unwrap()), ResourceVec::new(0.0, 2.0, 1.0, 1.0));
    }

    #[test]
    fn zero_cadence_never_fires() {
        let engine = ConsumptionEngine::new(ConsumptionConfig {
            a_days: 0,
            ..ConsumptionConfig::default()
        });
        assert!(!engine.is_due(Resource::A, 1));
    }
}
