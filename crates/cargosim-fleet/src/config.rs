//! Capacities and rest thresholds per airframe kind.
//!
//! These values correspond to the `fleet` section of the simulation YAML.
//! The [`FleetConfig`] struct bundles every tunable so that callers
//! (engine, tests) can override defaults.

use cargosim_types::AircraftKind;
use serde::Deserialize;

/// Per-kind aircraft parameters.
///
/// Capacity is in whole cargo units per sortie. The rest threshold is the
/// number of active periods an airframe may fly before it must spend a
/// period grounded at the hub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FleetConfig {
    /// Cargo units a heavy (C-130) can carry per sortie (default: 6).
    #[serde(default = "default_heavy_capacity")]
    pub heavy_capacity: u32,

    /// Cargo units a light (C-27) can carry per sortie (default: 3).
    #[serde(default = "default_light_capacity")]
    pub light_capacity: u32,

    /// Active periods before a heavy must rest (default: 6).
    #[serde(default = "default_heavy_rest_after")]
    pub heavy_rest_after: u32,

    /// Active periods before a light must rest (default: 12).
    #[serde(default = "default_light_rest_after")]
    pub light_rest_after: u32,
}

impl FleetConfig {
    /// Capacity for the given airframe kind.
    pub const fn capacity(&self, kind: AircraftKind) -> u32 {
        match kind {
            AircraftKind::Heavy => self.heavy_capacity,
            AircraftKind::Light => self.light_capacity,
        }
    }

    /// Active-period limit before rest for the given airframe kind.
    pub const fn rest_after(&self, kind: AircraftKind) -> u32 {
        match kind {
            AircraftKind::Heavy => self.heavy_rest_after,
            AircraftKind::Light => self.light_rest_after,
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            heavy_capacity: default_heavy_capacity(),
            light_capacity: default_light_capacity(),
            heavy_rest_after: default_heavy_rest_after(),
            light_rest_after: default_light_rest_after(),
        }
    }
}

const fn default_heavy_capacity() -> u32 {
    6
}

const fn default_light_capacity() -> u32 {
    3
}

const fn default_heavy_rest_after() -> u32 {
    6
}

const fn default_light_rest_after() -> u32 {
    12
}
