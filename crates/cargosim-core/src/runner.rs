//! Headless run loop.
//!
//! [`run_to_completion`] steps a [`Simulation`] until every configured
//! period has run or the callback asks to stop, and returns a
//! [`RunSummary`]. Renderers and recorders hook in through
//! [`PeriodCallback`]; they see each committed [`PeriodReport`] and the
//! simulation read-only.

use serde::Serialize;
use tracing::info;

use crate::engine::{PeriodReport, SimError, Simulation, StepOutcome};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndReason {
    /// Every configured period has run.
    PeriodsExhausted,
    /// The callback requested a stop.
    StoppedByCallback,
}

/// Result of a headless run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Why the run stopped.
    pub end_reason: EndReason,
    /// Periods computed during this run.
    pub total_periods: u64,
    /// Period the simulation stopped at.
    pub final_period: u64,
    /// Lifetime ops across the network.
    pub total_ops: u64,
    /// Lifetime ops per spoke, in index order.
    pub ops_by_spoke: Vec<u32>,
    /// Periods whose audit found violations.
    pub violating_periods: Vec<u64>,
}

/// Observer invoked after each committed period.
pub trait PeriodCallback {
    /// Called after a period commits.
    fn on_period(&mut self, report: &PeriodReport, sim: &Simulation);

    /// Checked after every period; return `true` to end the run early.
    fn should_stop(&self) -> bool {
        false
    }
}

/// A callback that ignores every period.
pub struct NoOpCallback;

impl PeriodCallback for NoOpCallback {
    fn on_period(&mut self, _report: &PeriodReport, _sim: &Simulation) {}
}

/// Step the simulation until it completes or the callback stops it.
///
/// # Errors
///
/// Returns [`SimError`] if a period cannot be computed.
pub fn run_to_completion(
    sim: &mut Simulation,
    callback: &mut dyn PeriodCallback,
) -> Result<RunSummary, SimError> {
    let mut total_periods: u64 = 0;

    info!(
        start_period = sim.clock().period(),
        periods = sim.config().periods,
        "Simulation starting"
    );

    let end_reason = loop {
        let report = match sim.step_forward()? {
            StepOutcome::Complete => break EndReason::PeriodsExhausted,
            StepOutcome::Replayed { .. } => continue,
            StepOutcome::Advanced(report) => report,
        };
        total_periods = total_periods.saturating_add(1);
        callback.on_period(&report, sim);
        if callback.should_stop() {
            info!(period = report.period, "Callback requested stop");
            break EndReason::StoppedByCallback;
        }
    };

    let network = sim.network();
    Ok(RunSummary {
        end_reason,
        total_periods,
        final_period: sim.clock().period(),
        total_ops: network.ops_total(),
        ops_by_spoke: network.ops_by_spoke(),
        violating_periods: sim.violating_periods().to_vec(),
    })
}

/// Log the end of a run.
pub fn log_run_end(summary: &RunSummary) {
    info!(
        reason = ?summary.end_reason,
        total_periods = summary.total_periods,
        final_period = summary.final_period,
        total_ops = summary.total_ops,
        ops_by_spoke = ?summary.ops_by_spoke,
        violating_periods = summary.violating_periods.len(),
        "Simulation ended"
    );
}
