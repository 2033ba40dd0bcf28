//! Post-period integrity audit for the `CargoSim` engine.
//!
//! After every period the engine hands the audit a baseline captured
//! before dispatch and the network as it stands after consumption. The
//! audit checks that the period left the network in a consistent state.
//!
//! # Architecture
//!
//! - [`integrity`] -- Pure verification: [`AuditBaseline`],
//!   [`IntegrityViolation`], and [`verify_period`].
//! - [`checker`] -- The stateful [`InvariantChecker`] that applies the
//!   log-once policy and keeps the violation history.
//!
//! # Checks
//!
//! | Check | Violation |
//! |-------|-----------|
//! | Every stock component is at least `-EPSILON` | [`IntegrityViolation::NegativeStock`] |
//! | Cached operational flag equals the live gate | [`IntegrityViolation::OperationalMismatch`] |
//! | Each new op drew one C and one D | [`IntegrityViolation::OpsWithoutConsumption`] |
//! | Loaded cargo never exceeds capacity | [`IntegrityViolation::PayloadOverCapacity`] |
//!
//! Violations are data, not errors. The audit never panics and never
//! stops the simulation; callers observe violations and carry on.

pub mod checker;
pub mod integrity;

pub use checker::InvariantChecker;
pub use integrity::{AuditBaseline, IntegrityViolation, verify_period};
