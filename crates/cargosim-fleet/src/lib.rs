//! Aircraft state, sortie lifecycle, and fleet composition for `CargoSim`.
//!
//! This crate contains the logic layer for aircraft -- everything that
//! operates on a single airframe's record without touching spoke stock.
//! Offloads are returned to the caller as [`Offload`] values; the engine
//! decides what they do to the network.
//!
//! # Modules
//!
//! - [`aircraft`] -- The per-aircraft record and its rest cycle ([`Aircraft`])
//! - [`config`] -- Capacities and rest thresholds per airframe kind ([`FleetConfig`])
//! - [`error`] -- Error types for fleet construction ([`FleetError`])
//! - [`roster`] -- Fleet labels, fleet building, and dispatch ordering
//! - [`sortie`] -- Sortie state machine: departure, legs, offloads, return

pub mod aircraft;
pub mod config;
pub mod error;
pub mod roster;
pub mod sortie;

// Re-export primary types at crate root for convenience.
pub use aircraft::Aircraft;
pub use config::FleetConfig;
pub use error::FleetError;
pub use roster::{DispatchKey, FleetLabel, build_fleet, dispatch_order};
pub use sortie::{Offload, SortieStep};
