//! Fleet labels, fleet construction, and dispatch ordering.
//!
//! Aircraft are always processed in the same order each period: larger
//! capacity first, ties broken by name. [`DispatchKey`] encodes that
//! precedence as an [`Ord`] so the ordering is checked at compile time
//! rather than assembled from closures at each call site.

use core::cmp::Reverse;
use core::str::FromStr;

use cargosim_types::AircraftKind;
use serde::Deserialize;

use crate::aircraft::Aircraft;
use crate::config::FleetConfig;
use crate::error::FleetError;

/// A named fleet composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum FleetLabel {
    /// Two heavies (`2xC130`).
    TwoHeavy,
    /// Four heavies (`4xC130`).
    FourHeavy,
    /// Two heavies and two lights (`2xC130_2xC27`).
    TwoHeavyTwoLight,
}

impl FleetLabel {
    /// Airframe counts as `(heavy, light)`.
    pub const fn composition(self) -> (u32, u32) {
        match self {
            Self::TwoHeavy => (2, 0),
            Self::FourHeavy => (4, 0),
            Self::TwoHeavyTwoLight => (2, 2),
        }
    }
}

impl FromStr for FleetLabel {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2xC130" => Ok(Self::TwoHeavy),
            "4xC130" => Ok(Self::FourHeavy),
            "2xC130_2xC27" => Ok(Self::TwoHeavyTwoLight),
            other => Err(FleetError::UnknownFleetLabel(other.to_owned())),
        }
    }
}

impl TryFrom<String> for FleetLabel {
    type Error = FleetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl core::fmt::Display for FleetLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::TwoHeavy => "2xC130",
            Self::FourHeavy => "4xC130",
            Self::TwoHeavyTwoLight => "2xC130_2xC27",
        };
        f.write_str(label)
    }
}

/// Build every aircraft for a fleet label, parked idle at the hub.
///
/// Heavies come first, numbered `C-130 #1..`, then lights `C-27 #1..`.
pub fn build_fleet(label: FleetLabel, config: &FleetConfig) -> Vec<Aircraft> {
    let (heavy, light) = label.composition();
    let mut fleet = Vec::new();
    for (kind, count) in [(AircraftKind::Heavy, heavy), (AircraftKind::Light, light)] {
        for number in 1..=count {
            fleet.push(Aircraft::new(
                format!("{} #{number}", kind.designator()),
                kind,
                config.capacity(kind),
                config.rest_after(kind),
            ));
        }
    }
    fleet
}

/// Processing precedence of an aircraft within a period.
///
/// Compares by descending capacity, then ascending name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DispatchKey<'a> {
    capacity: Reverse<u32>,
    name: &'a str,
}

impl Aircraft {
    /// This aircraft's dispatch precedence.
    pub fn dispatch_key(&self) -> DispatchKey<'_> {
        DispatchKey {
            capacity: Reverse(self.capacity),
            name: &self.name,
        }
    }
}

/// Fleet indices sorted into dispatch order.
pub fn dispatch_order(fleet: &[Aircraft]) -> Vec<usize> {
    let mut keyed: Vec<(DispatchKey<'_>, usize)> = fleet
        .iter()
        .enumerate()
        .map(|(idx, aircraft)| (aircraft.dispatch_key(), idx))
        .collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, idx)| idx).collect()
}
