//! Enumeration types for the `CargoSim` engine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// One of the four cargo classes carried from the hub to the spokes.
///
/// A spoke is operational only while it holds a positive amount of all
/// four. A and B are the life-support baseline; C and D are drawn down
/// each time a spoke performs an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Resource A (most critical baseline supply).
    A,
    /// Resource B (second baseline supply).
    B,
    /// Resource C (consumed by operations).
    C,
    /// Resource D (consumed by operations).
    D,
}

impl Resource {
    /// All resources in canonical `A, B, C, D` order.
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Position of this resource inside a [`ResourceVec`](crate::ResourceVec).
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Global scheduling priority for one period.
///
/// Determined at the start of each period from resident stock: if any
/// spoke lacks A the network is A-critical, otherwise if any lacks B it is
/// B-critical, otherwise it is in steady-state operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// At least one spoke has no A.
    A,
    /// Every spoke has A but at least one has no B.
    B,
    /// Every spoke holds A and B; C and D drive allocation.
    Ops,
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::B => "B",
            Self::Ops => "OPS",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Clock half
// ---------------------------------------------------------------------------

/// Half of a simulated day. Even periods are AM, odd periods are PM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    /// Morning half (even period index).
    Am,
    /// Afternoon half (odd period index). Consumption only fires here.
    Pm,
}

impl Half {
    /// The half a given period index falls in.
    pub const fn of_period(period: u64) -> Self {
        if period % 2 == 0 { Self::Am } else { Self::Pm }
    }
}

impl core::fmt::Display for Half {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Am => f.write_str("AM"),
            Self::Pm => f.write_str("PM"),
        }
    }
}

// ---------------------------------------------------------------------------
// Aircraft
// ---------------------------------------------------------------------------

/// Airframe class. Each kind carries its own capacity and rest threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AircraftKind {
    /// Heavy lifter (C-130 class).
    Heavy,
    /// Light lifter (C-27 class).
    Light,
}

impl AircraftKind {
    /// Type designator used when naming individual airframes.
    pub const fn designator(self) -> &'static str {
        match self {
            Self::Heavy => "C-130",
            Self::Light => "C-27",
        }
    }
}

impl core::fmt::Display for AircraftKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.designator())
    }
}

/// Lifecycle phase of an aircraft within a sortie.
///
/// `LoadingDeparting`, `AtFirstSpoke`, and `AtSecondSpoke` are transient:
/// they are entered and left within a single period step and are never
/// observed in a committed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightPhase {
    /// Parked at the hub with no plan.
    Idle,
    /// Cargo being loaded at the hub before departure.
    LoadingDeparting,
    /// Flying from the hub to the first spoke.
    EnrouteLeg1,
    /// On the ground at the first spoke, unloading.
    AtFirstSpoke,
    /// Flying from the first spoke to the second spoke.
    EnrouteLeg2,
    /// On the ground at the second spoke, unloading.
    AtSecondSpoke,
    /// Flying back to the hub.
    ReturnEnroute,
    /// Grounded at the hub serving a rest cooldown.
    Resting,
}
