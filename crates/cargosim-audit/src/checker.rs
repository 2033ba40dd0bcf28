//! Stateful invariant checker with the log-once policy.
//!
//! Only the first period with violations in a run is reported through
//! `tracing`; later violating periods are kept in memory so observability
//! panels can still list them without flooding the log.

use cargosim_fleet::Aircraft;
use cargosim_world::SpokeNetwork;
use serde::Serialize;
use tracing::{trace, warn};

use crate::integrity::{AuditBaseline, IntegrityViolation, verify_period};

/// Runs the per-period audit and remembers what it found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvariantChecker {
    current: Vec<IntegrityViolation>,
    violating_periods: Vec<u64>,
    logged: bool,
}

impl InvariantChecker {
    /// Create a checker with no history.
    pub const fn new() -> Self {
        Self {
            current: Vec::new(),
            violating_periods: Vec::new(),
            logged: false,
        }
    }

    /// Audit one period. Replaces the current violation list.
    pub fn audit(
        &mut self,
        period: u64,
        baseline: &AuditBaseline,
        network: &SpokeNetwork,
        fleet: &[Aircraft],
    ) -> &[IntegrityViolation] {
        self.current = verify_period(baseline, network, fleet);
        if !self.current.is_empty() {
            self.violating_periods.push(period);
            if self.logged {
                trace!(period, count = self.current.len(), "Integrity violations recorded");
            } else {
                self.logged = true;
                let reasons: Vec<String> =
                    self.current.iter().map(ToString::to_string).collect();
                warn!(period, violations = ?reasons, "Integrity violations detected");
            }
        }
        &self.current
    }

    /// Violations found by the most recent audit.
    pub fn violations(&self) -> &[IntegrityViolation] {
        &self.current
    }

    /// Every period whose audit found at least one violation.
    pub fn violating_periods(&self) -> &[u64] {
        &self.violating_periods
    }

    /// Whether the one-time external report has been emitted.
    pub const fn has_logged(&self) -> bool {
        self.logged
    }

    /// Adopt the findings of an earlier checker, keeping this run's
    /// log-once state. Used when history is rewound.
    pub fn rewind_to(&mut self, earlier: &Self) {
        self.current.clone_from(&earlier.current);
        self.violating_periods.clone_from(&earlier.violating_periods);
    }
}
