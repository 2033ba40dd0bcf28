//! Headless runner for `CargoSim`.
//!
//! Loads configuration, steps the simulation through every configured
//! period, and optionally writes the action log and run summary as JSON.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `CARGOSIM_CONFIG`, else
//!    `cargosim-config.yaml` in the working directory, else defaults
//! 2. Apply a `CARGOSIM_PAIR_ORDER` override (e.g. `"1-2, 3-4"`) if set
//! 3. Initialize structured logging (tracing), honoring `RUST_LOG` and
//!    falling back to the configured level
//! 4. Build the simulation and run it to completion
//! 5. Log the result and write `CARGOSIM_ACTION_LOG` /
//!    `CARGOSIM_SUMMARY` outputs when requested
//!
//! Set `CARGOSIM_LOG_FORMAT=json` for JSON log lines.

mod error;
mod log_callback;

use std::path::{Path, PathBuf};

use cargosim_core::config::parse_pair_order;
use cargosim_core::runner;
use cargosim_core::{SimConfig, Simulation};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::log_callback::LogCallback;

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "cargosim-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the run, or output writing fails.
fn main() -> Result<(), EngineError> {
    // Config comes first so its log level can seed the filter.
    let (config, source) = load_config()?;
    init_tracing(&config.logging.level);

    info!(
        source = %source,
        fleet = %config.fleet_label,
        periods = config.periods,
        seed = config.seed,
        targeting = config.targeting.enabled,
        "Configuration loaded"
    );

    let mut sim = Simulation::new(config)?;
    let mut callback = LogCallback::new();
    let summary = runner::run_to_completion(&mut sim, &mut callback)?;
    runner::log_run_end(&summary);

    if let Some(path) = std::env::var_os("CARGOSIM_ACTION_LOG") {
        write_json(&PathBuf::from(path), &sim.action_log_pairs())?;
    }
    if let Some(path) = std::env::var_os("CARGOSIM_SUMMARY") {
        write_json(&PathBuf::from(path), &summary)?;
    }

    info!(
        end_reason = ?summary.end_reason,
        total_ops = summary.total_ops,
        "cargosim-engine shutdown complete"
    );
    Ok(())
}

/// Resolve and load the configuration, returning it with a description
/// of where it came from.
fn load_config() -> Result<(SimConfig, String), EngineError> {
    let explicit = std::env::var_os("CARGOSIM_CONFIG").map(PathBuf::from);
    let (mut config, source) = match explicit {
        Some(path) => (SimConfig::from_file(&path)?, path.display().to_string()),
        None => {
            let path = Path::new(DEFAULT_CONFIG_PATH);
            if path.exists() {
                (SimConfig::from_file(path)?, DEFAULT_CONFIG_PATH.to_owned())
            } else {
                (SimConfig::default(), "defaults".to_owned())
            }
        }
    };

    if let Ok(text) = std::env::var("CARGOSIM_PAIR_ORDER") {
        config.pair_order = parse_pair_order(&text)?;
    }

    config.ensure_valid()?;
    Ok((config, source))
}

fn init_tracing(configured_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured_level));
    let json = std::env::var("CARGOSIM_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), EngineError> {
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body).map_err(|source| EngineError::Output {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "Output written");
    Ok(())
}
