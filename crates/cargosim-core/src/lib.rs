//! Period loop, dispatch, and rewind for the `CargoSim` engine.
//!
//! This crate owns the eight-phase period cycle: arrivals, stage
//! detection, dispatch, consumption, gate refresh, audit, commit, and
//! snapshot. It ties together the stock model, the fleet state machine,
//! and the audit, and decides where each aircraft flies.
//!
//! # Modules
//!
//! - [`clock`] -- Period counter with derived day and AM/PM half.
//! - [`config`] -- Configuration loading from `cargosim-config.yaml` into
//!   strongly-typed structs, plus validation.
//! - [`engine`] -- [`Simulation`]: the period cycle, rewind, and replay.
//! - [`history`] -- Per-period snapshots with optional eviction.
//! - [`planner`] -- Stage-aware cargo allocation for a sortie.
//! - [`runner`] -- Headless run loop with a per-period callback.
//! - [`scheduler`] -- Baseline round-robin pairing and per-period claims.
//! - [`stall`] -- Forced dispatch when the network stops making progress.
//! - [`targeting`] -- Benefit/cost route scoring ("smart targeting").
//!
//! [`Simulation`]: engine::Simulation

pub mod clock;
pub mod config;
pub mod engine;
pub mod history;
pub mod planner;
pub mod runner;
pub mod scheduler;
pub mod stall;
pub mod targeting;

pub use config::{ConfigError, SimConfig};
pub use engine::{PeriodReport, SimError, Simulation, StepOutcome};
