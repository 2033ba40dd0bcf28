//! The per-aircraft record and its rest cycle.
//!
//! An [`Aircraft`] carries everything the engine needs to move it through
//! a sortie: where it is, which [`FlightPhase`] it is in, the planned
//! [`Route`], the cargo for each leg, and its fatigue counters.
//!
//! # Rest cycle
//!
//! Every period in which an aircraft records progress increments
//! `active_periods`. Once an idle aircraft at the hub reaches its kind's
//! rest threshold it is grounded: the counter resets, `rest_cooldown` is
//! set to [`REST_COOLDOWN_PERIODS`], and the phase becomes
//! [`FlightPhase::Resting`]. Each subsequent period decrements the
//! cooldown; at zero the aircraft is idle again.
//!
//! Invariant: `rest_cooldown > 0` implies `phase == Resting` and
//! `location == Hub`.

use cargosim_types::{
    AircraftAction, AircraftKind, FlightPhase, Location, ResourceVec, Route,
};
use serde::{Deserialize, Serialize};

/// Number of periods an aircraft stays grounded once rest begins.
pub const REST_COOLDOWN_PERIODS: u32 = 1;

/// A single airframe and its sortie state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Display name, e.g. `C-130 #1`. Unique within a fleet.
    pub name: String,
    /// Airframe class.
    pub kind: AircraftKind,
    /// Cargo units per sortie.
    pub capacity: u32,
    /// Active periods allowed before mandatory rest.
    pub rest_after: u32,
    /// Current location.
    pub location: Location,
    /// Current lifecycle phase.
    pub phase: FlightPhase,
    /// Planned route for the sortie in progress, if any.
    pub route: Option<Route>,
    /// Cargo destined for the first spoke of the route.
    pub payload_leg1: ResourceVec,
    /// Cargo destined for the second spoke of the route.
    pub payload_leg2: ResourceVec,
    /// Periods with recorded progress since the last rest.
    pub active_periods: u32,
    /// Remaining rest periods; non-zero only while resting.
    pub rest_cooldown: u32,
}

impl Aircraft {
    /// Create an idle aircraft parked at the hub.
    pub fn new(
        name: impl Into<String>,
        kind: AircraftKind,
        capacity: u32,
        rest_after: u32,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            capacity,
            rest_after,
            location: Location::Hub,
            phase: FlightPhase::Idle,
            route: None,
            payload_leg1: ResourceVec::ZERO,
            payload_leg2: ResourceVec::ZERO,
            active_periods: 0,
            rest_cooldown: 0,
        }
    }

    /// Whether the aircraft is on the ground at the hub.
    pub const fn at_hub(&self) -> bool {
        matches!(self.location, Location::Hub)
    }

    /// Whether the aircraft is at the hub with no sortie and no rest pending.
    pub const fn is_idle_at_hub(&self) -> bool {
        self.at_hub() && matches!(self.phase, FlightPhase::Idle) && self.rest_cooldown == 0
    }

    /// Whether the aircraft is serving a rest cooldown.
    pub const fn is_resting(&self) -> bool {
        self.rest_cooldown > 0
    }

    /// Whether an idle aircraft has flown enough periods to require rest.
    pub const fn rest_due(&self) -> bool {
        self.is_idle_at_hub() && self.active_periods >= self.rest_after
    }

    /// Ground the aircraft at the hub and start its rest cooldown.
    pub const fn begin_rest(&mut self) -> AircraftAction {
        self.active_periods = 0;
        self.rest_cooldown = REST_COOLDOWN_PERIODS;
        self.phase = FlightPhase::Resting;
        self.location = Location::Hub;
        AircraftAction::InitiateRest
    }

    /// Spend one period resting. Returns the aircraft to idle when the
    /// cooldown runs out.
    pub const fn rest_one_period(&mut self) -> AircraftAction {
        self.rest_cooldown = self.rest_cooldown.saturating_sub(1);
        if self.rest_cooldown == 0 {
            self.phase = FlightPhase::Idle;
        }
        AircraftAction::Rest
    }

    /// Total cargo currently loaded across both legs.
    pub fn loaded_total(&self) -> f64 {
        self.payload_leg1.total() + self.payload_leg2.total()
    }
}
