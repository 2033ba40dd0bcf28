//! Spoke stock, arrivals, consumption, and geometry for `CargoSim`.
//!
//! This crate models the physical side of the network: what each spoke
//! holds right now, what is queued to arrive next period, how stock is
//! drawn down over time, and where the hub and spokes sit on the map.
//!
//! # Modules
//!
//! - [`consumption`] -- Cadence-driven draw-down of resident stock
//!   ([`ConsumptionEngine`]).
//! - [`error`] -- Error types for network and geometry operations.
//! - [`geometry`] -- Hub/spoke coordinates, distance matrix, and the P90
//!   distance reference used to normalise travel cost.
//! - [`network`] -- [`SpokeNetwork`]: resident stock, pending arrivals,
//!   the operational gate, ops counters, and stage detection.

pub mod consumption;
pub mod error;
pub mod geometry;
pub mod network;

// Re-export primary types at crate root.
pub use consumption::{ConsumptionConfig, ConsumptionEngine, ConsumptionReport};
pub use error::WorldError;
pub use geometry::{Geometry, Point};
pub use network::{Spoke, SpokeNetwork};
