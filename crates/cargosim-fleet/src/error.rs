//! Error types for the cargosim-fleet crate.

/// Errors that can occur while assembling a fleet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FleetError {
    /// The configured fleet label does not name a known composition.
    #[error("unknown fleet label: {0:?} (expected one of 2xC130, 4xC130, 2xC130_2xC27)")]
    UnknownFleetLabel(String),
}
