//! Shared type definitions for the `CargoSim` logistics engine.
//!
//! This crate is the single source of truth for the vocabulary used across
//! the `CargoSim` workspace: spoke indices, resource vectors, aircraft
//! lifecycle phases, routes, and the human-readable action log.
//!
//! # Modules
//!
//! - [`ids`] -- Bounded spoke index and hub/spoke locations
//! - [`enums`] -- Enumeration types (resources, stages, halves, aircraft kinds, phases)
//! - [`stock`] -- Four-component resource vectors and the operational gate
//! - [`route`] -- Single/paired sortie routes and their pairing keys
//! - [`actions`] -- Per-period action log entries with the fixed vocabulary

pub mod actions;
pub mod enums;
pub mod ids;
pub mod route;
pub mod stock;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionLogEntry, AircraftAction, PeriodLog};
pub use enums::{AircraftKind, FlightPhase, Half, Resource, Stage};
pub use ids::{Location, SPOKE_COUNT, SpokeIdx, SpokeIndexError};
pub use route::{PairingKey, Route};
pub use stock::{EPSILON, ResourceVec, is_ops_capable};
