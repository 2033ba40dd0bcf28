//! Period callback that logs each committed period.

use cargosim_core::runner::PeriodCallback;
use cargosim_core::{PeriodReport, Simulation};
use tracing::{debug, info};

/// Logs a one-line summary per period, plus each action and audit finding
/// at debug level.
#[derive(Debug, Default)]
pub struct LogCallback {
    periods_seen: u64,
}

impl LogCallback {
    /// Create a callback that has seen no periods.
    pub const fn new() -> Self {
        Self { periods_seen: 0 }
    }

    /// Periods reported so far.
    pub const fn periods_seen(&self) -> u64 {
        self.periods_seen
    }
}

impl PeriodCallback for LogCallback {
    fn on_period(&mut self, report: &PeriodReport, sim: &Simulation) {
        self.periods_seen = self.periods_seen.saturating_add(1);

        info!(
            period = report.period,
            stage = ?report.stage,
            actions = report.actions.len(),
            arrivals = report.arrivals,
            new_ops = report.new_ops,
            operational_spokes = report.operational_spokes,
            total_ops = sim.network().ops_total(),
            forced_sortie = report.forced_sortie,
            "Period complete"
        );

        for entry in &report.actions {
            debug!(
                period = report.period,
                aircraft = %entry.aircraft,
                action = %entry.action,
                "Action"
            );
        }

        for violation in &report.violations {
            debug!(period = report.period, violation = %violation, "Integrity violation");
        }
    }
}
