//! Stall breaker: forces a sortie when the network stops making progress.
//!
//! A period with no logged actions and no new ops counts as stuck. Once
//! enough stuck periods accumulate, the first idle aircraft at the hub (in
//! fleet order) is sent on a fixed single-leg sortie. Period 0 never counts.

use cargosim_fleet::Aircraft;
use cargosim_types::{ActionLogEntry, ResourceVec, SpokeIdx};
use cargosim_world::WorldError;
use tracing::warn;

use crate::config::StallConfig;

/// Tracks stuck periods and performs the forced dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct StallBreaker {
    threshold: u32,
    forced_spoke: SpokeIdx,
    forced_payload: ResourceVec,
    stuck_periods: u32,
}

impl StallBreaker {
    /// Build a breaker from its policy.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SpokeOutOfRange`] if the forced spoke does
    /// not exist.
    pub fn from_config(config: &StallConfig) -> Result<Self, WorldError> {
        let forced_spoke = SpokeIdx::new(config.forced_spoke)
            .ok_or(WorldError::SpokeOutOfRange(config.forced_spoke))?;
        Ok(Self {
            threshold: config.threshold_periods.max(1),
            forced_spoke,
            forced_payload: config.forced_payload,
            stuck_periods: 0,
        })
    }

    /// Consecutive stuck periods so far.
    pub const fn stuck_periods(&self) -> u32 {
        self.stuck_periods
    }

    /// Reset the counter to a stored value.
    pub const fn restore(&mut self, stuck_periods: u32) {
        self.stuck_periods = stuck_periods;
    }

    /// Record the outcome of `period`. Returns `true` when a forced
    /// sortie is due; the counter is reset in that case.
    pub const fn observe(&mut self, period: u64, actions: usize, new_ops: u64) -> bool {
        if actions > 0 || new_ops > 0 {
            self.stuck_periods = 0;
            return false;
        }
        if period == 0 {
            return false;
        }
        self.stuck_periods = self.stuck_periods.saturating_add(1);
        if self.stuck_periods >= self.threshold {
            self.stuck_periods = 0;
            true
        } else {
            false
        }
    }

    /// Send the first idle aircraft at the hub on the forced sortie.
    ///
    /// Returns the log entry, or `None` if no aircraft was available.
    pub fn force(&self, period: u64, fleet: &mut [Aircraft]) -> Option<ActionLogEntry> {
        let Some(aircraft) = fleet.iter_mut().find(|ac| ac.is_idle_at_hub()) else {
            warn!(period, "Stall detected but no idle aircraft at the hub");
            return None;
        };
        let action = aircraft.force_sortie(self.forced_spoke, self.forced_payload);
        warn!(
            period,
            aircraft = %aircraft.name,
            spoke = %self.forced_spoke,
            "Stall breaker forced a sortie"
        );
        Some(ActionLogEntry::new(aircraft.name.clone(), action))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cargosim_types::{AircraftAction, AircraftKind, FlightPhase};

    use super::*;

    fn breaker() -> StallBreaker {
        StallBreaker::from_config(&StallConfig::default()).unwrap()
    }

    #[test]
    fn fires_after_threshold_stuck_periods() {
        let mut b = breaker();
        assert!(!b.observe(0, 0, 0));
        assert_eq!(b.stuck_periods(), 0);
        assert!(!b.observe(1, 0, 0));
        assert_eq!(b.stuck_periods(), 1);
        assert!(!b.observe(2, 0, 0));
        assert!(b.observe(3, 0, 0));
        assert_eq!(b.stuck_periods(), 0);
    }

    #[test]
    fn progress_resets_counter() {
        let mut b = breaker();
        assert!(!b.observe(2, 0, 0));
        assert!(!b.observe(3, 0, 0));
        assert!(!b.observe(4, 1, 0));
        assert_eq!(b.stuck_periods(), 0);
        assert!(!b.observe(5, 0, 0));
        assert!(!b.observe(6, 0, 2));
        assert_eq!(b.stuck_periods(), 0);
    }

    #[test]
    fn force_picks_first_idle_aircraft_in_fleet_order() {
        let b = breaker();
        let mut fleet = vec![
            Aircraft::new("C-130 #1", AircraftKind::Heavy, 6, 6),
            Aircraft::new("C-130 #2", AircraftKind::Heavy, 6, 6),
        ];
        fleet.first_mut().unwrap().phase = FlightPhase::EnrouteLeg1;
        let entry = b.force(5, &mut fleet).unwrap();
        assert_eq!(entry.aircraft, "C-130 #2");
        assert_eq!(
            entry.action,
            AircraftAction::ForcedMove {
                to: SpokeIdx::new(0).unwrap()
            }
        );
        assert_eq!(entry.action.to_string(), "FORCED MOVE HUB→S1");
        assert_eq!(fleet.get(1).unwrap().phase, FlightPhase::EnrouteLeg1);
    }

    #[test]
    fn out_of_range_spoke_is_rejected() {
        let config = StallConfig {
            forced_spoke: 12,
            ..StallConfig::default()
        };
        assert_eq!(
            StallBreaker::from_config(&config),
            Err(WorldError::SpokeOutOfRange(12))
        );
    }
}
