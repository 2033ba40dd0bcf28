//! Per-period action log.
//!
//! Every step of the simulation commits one [`PeriodLog`]: the ordered list
//! of things each aircraft did during that period. Renderers and recorders
//! consume the log as `(aircraft_name, description)` string pairs, so the
//! [`Display`](core::fmt::Display) output of [`AircraftAction`] is a fixed
//! vocabulary that downstream parsers rely on:
//!
//! | Action | Text |
//! |---|---|
//! | [`AircraftAction::Onload`] | `ONLOAD@HUB→S{n}` |
//! | [`AircraftAction::Move`] | `MOVE {src}→{dst}` |
//! | [`AircraftAction::Offload`] | `OFFLOAD@S{n}` |
//! | [`AircraftAction::InitiateRest`] | `INITIATE REST at HUB` |
//! | [`AircraftAction::Rest`] | `REST at HUB` |
//! | [`AircraftAction::ForcedMove`] | `FORCED MOVE HUB→S{n}` |

use serde::{Deserialize, Serialize};

use crate::ids::{Location, SpokeIdx};

/// Something an aircraft did during a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AircraftAction {
    /// Cargo loaded at the hub for a sortie whose first leg ends at `to`.
    Onload {
        /// First spoke of the sortie.
        to: SpokeIdx,
    },
    /// Departure from one location toward another.
    Move {
        /// Departure point.
        from: Location,
        /// Destination.
        to: Location,
    },
    /// Cargo unloaded at a spoke.
    Offload {
        /// The spoke receiving the cargo.
        at: SpokeIdx,
    },
    /// The aircraft hit its active-period limit and was grounded.
    InitiateRest,
    /// The aircraft spent this period resting.
    Rest,
    /// The stall breaker dispatched an idle aircraft.
    ForcedMove {
        /// Destination spoke of the forced sortie.
        to: SpokeIdx,
    },
}

impl core::fmt::Display for AircraftAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Onload { to } => write!(f, "ONLOAD@HUB→{to}"),
            Self::Move { from, to } => write!(f, "MOVE {from}→{to}"),
            Self::Offload { at } => write!(f, "OFFLOAD@{at}"),
            Self::InitiateRest => f.write_str("INITIATE REST at HUB"),
            Self::Rest => f.write_str("REST at HUB"),
            Self::ForcedMove { to } => write!(f, "FORCED MOVE HUB→{to}"),
        }
    }
}

/// One line of the action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    /// Name of the aircraft that acted (e.g. `C-130 #1`).
    pub aircraft: String,
    /// What it did.
    pub action: AircraftAction,
}

impl ActionLogEntry {
    /// Create an entry for the named aircraft.
    pub fn new(aircraft: impl Into<String>, action: AircraftAction) -> Self {
        Self {
            aircraft: aircraft.into(),
            action,
        }
    }

    /// The `(aircraft_name, description)` form consumed by renderers.
    pub fn to_pair(&self) -> (String, String) {
        (self.aircraft.clone(), self.action.to_string())
    }
}

/// All actions committed during one period, in processing order.
pub type PeriodLog = Vec<ActionLogEntry>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn spoke(i: usize) -> SpokeIdx {
        SpokeIdx::new(i).unwrap()
    }

    #[test]
    fn vocabulary_is_stable() {
        let cases = [
            (AircraftAction::Onload { to: spoke(0) }, "ONLOAD@HUB→S1"),
            (
                AircraftAction::Move {
                    from: Location::Spoke(spoke(2)),
                    to: Location::Spoke(spoke(3)),
                },
                "MOVE S3→S4",
            ),
            (
                AircraftAction::Move {
                    from: Location::Spoke(spoke(9)),
                    to: Location::Hub,
                },
                "MOVE S10→HUB",
            ),
            (AircraftAction::Offload { at: spoke(4) }, "OFFLOAD@S5"),
            (AircraftAction::InitiateRest, "INITIATE REST at HUB"),
            (AircraftAction::Rest, "REST at HUB"),
            (AircraftAction::ForcedMove { to: spoke(0) }, "FORCED MOVE HUB→S1"),
        ];
        for (action, text) in cases {
            assert_eq!(action.to_string(), text);
        }
    }

    #[test]
    fn entry_pair_form() {
        let entry = ActionLogEntry::new("C-130 #1", AircraftAction::Rest);
        assert_eq!(
            entry.to_pair(),
            ("C-130 #1".to_owned(), "REST at HUB".to_owned())
        );
    }
}
