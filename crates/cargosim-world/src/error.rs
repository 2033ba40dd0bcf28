//! Error types for the `cargosim-world` crate.

use cargosim_types::SPOKE_COUNT;

/// Errors that can occur during network and geometry operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// A spoke index outside `0..SPOKE_COUNT` was supplied.
    #[error("spoke index {0} is outside 0..{SPOKE_COUNT}")]
    SpokeOutOfRange(usize),

    /// A geometry was supplied with the wrong number of spoke positions.
    #[error("geometry has {found} spoke positions, expected {SPOKE_COUNT}")]
    GeometrySpokeCount {
        /// Number of positions supplied.
        found: usize,
    },

    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate in geometry: ({x}, {y})")]
    NonFiniteCoordinate {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
}
