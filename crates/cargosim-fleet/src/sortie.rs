//! Sortie state machine.
//!
//! ```text
//! Idle@Hub -> LoadingDeparting -> EnrouteLeg1 -> AtFirstSpoke (unload)
//!          -> [EnrouteLeg2 -> AtSecondSpoke (unload)]? -> ReturnEnroute -> Idle@Hub
//! ```
//!
//! Each call to [`Aircraft::advance_sortie`] moves an airborne aircraft one
//! period forward. Within a period an aircraft records at most
//! [`MAX_PROGRESS_EVENTS`] progress events (for example: offload, then
//! depart for the next leg). Only the first event of a period increments
//! `active_periods`, so flight hours accrue once per period no matter how
//! many discrete actions happen.

use cargosim_types::{AircraftAction, FlightPhase, Location, ResourceVec, Route, SpokeIdx};

use crate::aircraft::Aircraft;

/// Upper bound on progress events per aircraft per period.
pub const MAX_PROGRESS_EVENTS: u8 = 2;

/// Cargo unloaded at a spoke during a sortie step.
///
/// The caller queues `payload` as a next-period arrival at `spoke` and
/// decides whether the spoke performs an operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offload {
    /// The spoke that received the cargo.
    pub spoke: SpokeIdx,
    /// The cargo unloaded.
    pub payload: ResourceVec,
}

/// What happened to an aircraft during one sortie step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortieStep {
    /// Cargo unloaded this period, if the aircraft reached a spoke.
    pub offload: Option<Offload>,
    /// Actions to commit to the period log, in order.
    pub actions: Vec<AircraftAction>,
    /// Whether the aircraft landed back at the hub this period.
    pub landed: bool,
}

/// Progress events recorded for one aircraft in the current period.
#[derive(Debug, Default)]
struct ProgressEvents(u8);

impl ProgressEvents {
    /// Record one event. Returns `false` once the per-period cap is reached.
    const fn record(&mut self, aircraft: &mut Aircraft) -> bool {
        if self.0 >= MAX_PROGRESS_EVENTS {
            return false;
        }
        if self.0 == 0 {
            aircraft.active_periods = aircraft.active_periods.saturating_add(1);
        }
        self.0 = self.0.saturating_add(1);
        true
    }
}

impl Aircraft {
    /// Load cargo at the hub and depart toward the first spoke of `route`.
    ///
    /// Emits `ONLOAD@HUB->S{i}` and `MOVE HUB->S{i}`; the aircraft leaves
    /// in [`FlightPhase::EnrouteLeg1`]. Both actions count as progress
    /// events, so the sortie accrues one active period.
    pub fn begin_sortie(
        &mut self,
        route: Route,
        payload_leg1: ResourceVec,
        payload_leg2: ResourceVec,
    ) -> Vec<AircraftAction> {
        let first = route.first();
        self.route = Some(route);
        self.payload_leg1 = payload_leg1;
        self.payload_leg2 = payload_leg2;
        self.phase = FlightPhase::LoadingDeparting;

        let mut events = ProgressEvents::default();
        let mut actions = Vec::with_capacity(usize::from(MAX_PROGRESS_EVENTS));
        if events.record(self) {
            actions.push(AircraftAction::Onload { to: first });
        }
        if events.record(self) {
            actions.push(AircraftAction::Move {
                from: Location::Hub,
                to: Location::Spoke(first),
            });
        }
        self.phase = FlightPhase::EnrouteLeg1;
        actions
    }

    /// Dispatch an idle aircraft on a single-leg sortie outside the normal
    /// scheduler. Used by the stall breaker; does not accrue an active period.
    pub const fn force_sortie(&mut self, spoke: SpokeIdx, payload: ResourceVec) -> AircraftAction {
        self.route = Some(Route::Single(spoke));
        self.payload_leg1 = payload;
        self.payload_leg2 = ResourceVec::ZERO;
        self.phase = FlightPhase::EnrouteLeg1;
        AircraftAction::ForcedMove { to: spoke }
    }

    /// Advance an airborne aircraft by one period.
    ///
    /// Returns `None` for aircraft that are not on a sortie (idle or
    /// resting); those are handled by the rest cycle and the scheduler.
    pub fn advance_sortie(&mut self) -> Option<SortieStep> {
        match self.phase {
            FlightPhase::EnrouteLeg1 => Some(self.arrive_first_spoke()),
            FlightPhase::EnrouteLeg2 => Some(self.arrive_second_spoke()),
            FlightPhase::ReturnEnroute => {
                self.location = Location::Hub;
                self.phase = FlightPhase::Idle;
                Some(SortieStep {
                    landed: true,
                    ..SortieStep::default()
                })
            }
            FlightPhase::Idle
            | FlightPhase::LoadingDeparting
            | FlightPhase::AtFirstSpoke
            | FlightPhase::AtSecondSpoke
            | FlightPhase::Resting => None,
        }
    }

    fn arrive_first_spoke(&mut self) -> SortieStep {
        let Some(route) = self.route else {
            return self.abort_to_return();
        };
        let first = route.first();
        self.location = Location::Spoke(first);
        self.phase = FlightPhase::AtFirstSpoke;

        let mut step = SortieStep::default();
        let mut events = ProgressEvents::default();
        if events.record(self) {
            step.offload = Some(Offload {
                spoke: first,
                payload: core::mem::take(&mut self.payload_leg1),
            });
            step.actions.push(AircraftAction::Offload { at: first });
        }
        if events.record(self) {
            match route.second() {
                Some(second) => {
                    step.actions.push(AircraftAction::Move {
                        from: Location::Spoke(first),
                        to: Location::Spoke(second),
                    });
                    self.phase = FlightPhase::EnrouteLeg2;
                }
                None => {
                    step.actions.push(AircraftAction::Move {
                        from: Location::Spoke(first),
                        to: Location::Hub,
                    });
                    self.route = None;
                    self.phase = FlightPhase::ReturnEnroute;
                }
            }
        }
        step
    }

    fn arrive_second_spoke(&mut self) -> SortieStep {
        let Some(second) = self.route.and_then(Route::second) else {
            return self.abort_to_return();
        };
        self.location = Location::Spoke(second);
        self.phase = FlightPhase::AtSecondSpoke;

        let mut step = SortieStep::default();
        let mut events = ProgressEvents::default();
        if events.record(self) {
            step.offload = Some(Offload {
                spoke: second,
                payload: core::mem::take(&mut self.payload_leg2),
            });
            step.actions.push(AircraftAction::Offload { at: second });
        }
        if events.record(self) {
            step.actions.push(AircraftAction::Move {
                from: Location::Spoke(second),
                to: Location::Hub,
            });
            self.route = None;
            self.phase = FlightPhase::ReturnEnroute;
        }
        step
    }

    /// An airborne aircraft without a usable route heads home empty.
    fn abort_to_return(&mut self) -> SortieStep {
        self.route = None;
        self.payload_leg1 = ResourceVec::ZERO;
        self.payload_leg2 = ResourceVec::ZERO;
        self.phase = FlightPhase::ReturnEnroute;
        SortieStep::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cargosim_types::AircraftKind;

    use super::*;

    fn spoke(i: usize) -> SpokeIdx {
        SpokeIdx::new(i).unwrap()
    }

    fn heavy() -> Aircraft {
        Aircraft::new("C-130 #1", AircraftKind::Heavy, 6, 6)
    }

    #[test]
    fn departure_counts_one_active_period() {
        let mut ac = heavy();
        let actions = ac.begin_sortie(
            Route::Single(spoke(0)),
            ResourceVec::new(1.0, 1.0, 0.0, 0.0),
            ResourceVec::ZERO,
        );
        assert_eq!(
            actions,
            vec![
                AircraftAction::Onload { to: spoke(0) },
                AircraftAction::Move {
                    from: Location::Hub,
                    to: Location::Spoke(spoke(0)),
                },
            ]
        );
        assert_eq!(ac.active_periods, 1);
        assert_eq!(ac.phase, FlightPhase::EnrouteLeg1);
        assert!(ac.at_hub());
    }

    #[test]
    fn paired_sortie_visits_both_spokes_then_returns() {
        let mut ac = heavy();
        let leg1 = ResourceVec::new(2.0, 1.0, 0.0, 0.0);
        let leg2 = ResourceVec::new(2.0, 1.0, 0.0, 0.0);
        let _ = ac.begin_sortie(Route::Pair(spoke(0), spoke(1)), leg1, leg2);

        let first = ac.advance_sortie().unwrap();
        assert_eq!(first.offload, Some(Offload { spoke: spoke(0), payload: leg1 }));
        assert_eq!(
            first.actions.get(1),
            Some(&AircraftAction::Move {
                from: Location::Spoke(spoke(0)),
                to: Location::Spoke(spoke(1)),
            })
        );
        assert_eq!(ac.phase, FlightPhase::EnrouteLeg2);
        assert_eq!(ac.active_periods, 2);

        let second = ac.advance_sortie().unwrap();
        assert_eq!(second.offload.map(|o| o.spoke), Some(spoke(1)));
        assert_eq!(ac.phase, FlightPhase::ReturnEnroute);
        assert!(ac.route.is_none());

        let home = ac.advance_sortie().unwrap();
        assert!(home.landed);
        assert!(home.actions.is_empty());
        assert!(ac.is_idle_at_hub());
        assert_eq!(ac.active_periods, 3);
    }

    #[test]
    fn single_leg_returns_after_first_offload() {
        let mut ac = heavy();
        let _ = ac.begin_sortie(
            Route::Single(spoke(4)),
            ResourceVec::new(0.0, 0.0, 1.0, 1.0),
            ResourceVec::ZERO,
        );
        let step = ac.advance_sortie().unwrap();
        assert_eq!(
            step.actions,
            vec![
                AircraftAction::Offload { at: spoke(4) },
                AircraftAction::Move {
                    from: Location::Spoke(spoke(4)),
                    to: Location::Hub,
                },
            ]
        );
        assert_eq!(ac.phase, FlightPhase::ReturnEnroute);
        assert!(ac.payload_leg1.is_empty());
    }

    #[test]
    fn forced_sortie_does_not_accrue() {
        let mut ac = heavy();
        let action = ac.force_sortie(spoke(0), ResourceVec::new(1.0, 1.0, 0.0, 0.0));
        assert_eq!(action.to_string(), "FORCED MOVE HUB→S1");
        assert_eq!(ac.active_periods, 0);
        assert_eq!(ac.phase, FlightPhase::EnrouteLeg1);
    }

    #[test]
    fn idle_aircraft_does_not_advance() {
        let mut ac = heavy();
        assert!(ac.advance_sortie().is_none());
    }
}
