//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps one subsystem failure so `main` can propagate
/// everything with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: cargosim_core::ConfigError,
    },

    /// The simulation could not be built or stepped.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: cargosim_core::SimError,
    },

    /// Writing an output file failed.
    #[error("failed to write {path}: {source}")]
    Output {
        /// The file being written.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Encoding an output document failed.
    #[error("failed to encode output: {source}")]
    Encode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
