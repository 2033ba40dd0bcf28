//! The period loop: the engine that drives a `CargoSim` run.
//!
//! Each call to [`Simulation::step_period`] runs one half-day through
//! these phases:
//!
//! 1. **Arrivals** -- cargo offloaded last period lands in resident stock,
//!    operational flags are refreshed, and the audit baseline is captured.
//! 2. **Stage** -- the global stage (A, B, or Ops) is read off the network.
//! 3. **Dispatch** -- aircraft act in dispatch order: rest, advance an
//!    in-flight sortie, or request a new route from the pairing scheduler
//!    (or smart targeting when enabled).
//! 4. **Consumption** -- PM periods draw down stock on each resource's
//!    cadence.
//! 5. **Gate** -- operational flags are recomputed from resident stock.
//! 6. **Audit** -- invariants are checked against the baseline.
//! 7. **Commit** -- the stall breaker may add a forced sortie, then the
//!    period's actions are appended to the log and the clock advances.
//! 8. **Snapshot** -- the new state is checkpointed for rewind.
//!
//! The engine owns all state; callers read it through `&` accessors.

use cargosim_audit::{AuditBaseline, IntegrityViolation, InvariantChecker};
use cargosim_fleet::{Aircraft, build_fleet, dispatch_order};
use cargosim_types::{
    ActionLogEntry, Location, PeriodLog, Resource, ResourceVec, SpokeIdx, Stage,
};
use cargosim_world::{ConsumptionEngine, ConsumptionReport, SpokeNetwork};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{ClockError, SimClock};
use crate::config::{ConfigError, SimConfig};
use crate::history::{HistoryError, Snapshot, SnapshotHistory};
use crate::scheduler::{PairingScheduler, PeriodClaims};
use crate::stall::StallBreaker;
use crate::targeting::{RouteDebug, SmartTargeting};

/// Golden-ratio increment used to spread per-period seeds.
const PERIOD_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Salt separating debug scoring draws from dispatch draws.
const DEBUG_SEED_SALT: u64 = 0xD1B5_4A32_D192_ED03;

/// Errors that can occur while building or driving a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The configuration could not be applied.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The clock could not advance.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),

    /// A history operation had nothing to work with.
    #[error("history error: {0}")]
    History(#[from] HistoryError),
}

/// Everything that happened in one committed period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    /// The period that ran.
    pub period: u64,
    /// Stage in effect during dispatch.
    pub stage: Stage,
    /// Committed actions, in log order.
    pub actions: PeriodLog,
    /// Payloads that landed at the start of the period.
    pub arrivals: usize,
    /// Ops performed during the period.
    pub new_ops: u64,
    /// Resources whose consumption cadence fired.
    pub consumed: Vec<Resource>,
    /// Spokes operational at the end of the period.
    pub operational_spokes: usize,
    /// Audit findings for the period.
    pub violations: Vec<IntegrityViolation>,
    /// Whether the stall breaker dispatched an aircraft.
    pub forced_sortie: bool,
}

/// Result of asking the engine to move forward.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A period was computed.
    Advanced(Box<PeriodReport>),
    /// A stored period was replayed from history.
    Replayed {
        /// The period the simulation now resumes from.
        period: u64,
    },
    /// The configured number of periods has already run.
    Complete,
}

impl StepOutcome {
    /// The report of a computed period, if one was computed.
    pub fn into_report(self) -> Option<PeriodReport> {
        match self {
            Self::Advanced(report) => Some(*report),
            Self::Replayed { .. } | Self::Complete => None,
        }
    }
}

/// A configured, running simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    clock: SimClock,
    network: SpokeNetwork,
    fleet: Vec<Aircraft>,
    dispatch: Vec<usize>,
    scheduler: PairingScheduler,
    targeting: SmartTargeting,
    consumption: ConsumptionEngine,
    checker: InvariantChecker,
    stall: StallBreaker,
    action_log: Vec<PeriodLog>,
    ops_total_history: Vec<u64>,
    history: SnapshotHistory,
}

impl Simulation {
    /// Build a simulation at period 0 and record the initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration fails validation,
    /// names an unknown fleet, or describes an unusable map.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.ensure_valid()?;
        let label = config.fleet_label()?;
        let geometry = config.geometry.build().map_err(ConfigError::from)?;
        let stall = StallBreaker::from_config(&config.stall).map_err(ConfigError::from)?;

        let fleet = build_fleet(label, &config.fleet);
        let dispatch = dispatch_order(&fleet);
        let mut network = SpokeNetwork::new(config.initial_stock);
        network.refresh_operational();

        let mut sim = Self {
            clock: SimClock::new(),
            network,
            fleet,
            dispatch,
            scheduler: PairingScheduler::new(config.resolved_pair_order()),
            targeting: SmartTargeting::new(config.targeting.clone(), geometry),
            consumption: ConsumptionEngine::new(config.consumption.clone()),
            checker: InvariantChecker::new(),
            stall,
            action_log: Vec::new(),
            ops_total_history: vec![0],
            history: SnapshotHistory::new(config.history.max_snapshots),
            config,
        };
        sim.history.push(sim.capture(PeriodLog::new()));

        info!(
            fleet = %sim.config.fleet_label,
            aircraft = sim.fleet.len(),
            periods = sim.config.periods,
            seed = sim.config.seed,
            targeting = sim.config.targeting.enabled,
            "Simulation initialised"
        );
        Ok(sim)
    }

    /// Rebuild the world from the configuration: stock, fleet, cursor,
    /// logs, counters, targeting state, and history.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] under the same conditions as
    /// [`Simulation::new`].
    pub fn reset(&mut self) -> Result<(), SimError> {
        *self = Self::new(self.config.clone())?;
        Ok(())
    }

    /// Run one period.
    ///
    /// Any stored snapshots beyond the current period are discarded first,
    /// so stepping after a [`restore`](Self::restore) recomputes the future.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Clock`] if the period counter would overflow.
    pub fn step_period(&mut self) -> Result<StepOutcome, SimError> {
        let period = self.clock.period();
        if period >= self.config.periods {
            return Ok(StepOutcome::Complete);
        }
        self.history.truncate_after(period);

        // --- Phase 1: Arrivals ---
        let arrivals = self.network.apply_arrivals();
        self.network.refresh_operational();
        let baseline = AuditBaseline::capture(&self.network);
        let ops_before = self.network.ops_total();

        // --- Phase 2: Stage ---
        let stage = self.network.detect_stage();

        // --- Phase 3: Dispatch ---
        let mut actions = self.dispatch_fleet(period, stage);

        // --- Phase 4: Consumption ---
        let ConsumptionReport { fired, .. } = self.consumption.apply(&mut self.network, period);

        // --- Phase 5: Gate ---
        self.network.refresh_operational();

        // --- Phase 6: Audit ---
        let violations = self
            .checker
            .audit(period, &baseline, &self.network, &self.fleet)
            .to_vec();

        // --- Phase 7: Commit ---
        let new_ops = self.network.ops_total().saturating_sub(ops_before);
        let forced = if self.stall.observe(period, actions.len(), new_ops) {
            self.stall.force(period, &mut self.fleet)
        } else {
            None
        };
        let forced_sortie = forced.is_some();
        actions.extend(forced);
        self.targeting.end_period();
        self.action_log.push(actions.clone());
        self.push_ops_sample();
        self.clock.advance()?;

        // --- Phase 8: Snapshot ---
        self.history.push(self.capture(actions.clone()));

        debug!(
            period,
            stage = %stage,
            actions = actions.len(),
            new_ops,
            consumed = ?fired,
            operational = self.network.operational_count(),
            "Period committed"
        );

        Ok(StepOutcome::Advanced(Box::new(PeriodReport {
            period,
            stage,
            actions,
            arrivals,
            new_ops,
            consumed: fired,
            operational_spokes: self.network.operational_count(),
            violations,
            forced_sortie,
        })))
    }

    /// Move one period back, discarding the newest snapshot.
    ///
    /// Any snapshots ahead of the current period (left by
    /// [`restore`](Self::restore)) are discarded as well.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToStepBack`] when fewer than two
    /// snapshots remain.
    pub fn step_back(&mut self) -> Result<(), SimError> {
        self.history.truncate_after(self.clock.period());
        if self.history.len() < 2 {
            return Err(HistoryError::NothingToStepBack.into());
        }
        self.history.pop_latest();
        let snapshot = self
            .history
            .latest()
            .cloned()
            .ok_or(HistoryError::NothingToStepBack)?;
        self.apply(&snapshot);
        debug!(period = self.clock.period(), "Stepped back");
        Ok(())
    }

    /// Jump to a stored period without discarding later history.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoSnapshot`] if `period` is not stored.
    pub fn restore(&mut self, period: u64) -> Result<(), SimError> {
        let snapshot = self
            .history
            .get(period)
            .cloned()
            .ok_or(HistoryError::NoSnapshot { period })?;
        self.apply(&snapshot);
        debug!(period, "Restored snapshot");
        Ok(())
    }

    /// Move one period forward, replaying stored history when available
    /// and computing a new period otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Clock`] if a computed step overflows the clock.
    pub fn step_forward(&mut self) -> Result<StepOutcome, SimError> {
        let next = self.clock.period().saturating_add(1);
        if let Some(snapshot) = self.history.get(next).cloned() {
            self.apply(&snapshot);
            return Ok(StepOutcome::Replayed { period: next });
        }
        self.step_period()
    }

    /// A snapshot of the current state, carrying the last committed
    /// period's actions.
    pub fn snapshot(&self) -> Snapshot {
        self.capture(self.action_log.last().cloned().unwrap_or_default())
    }

    /// Every committed period's actions, oldest first.
    pub fn action_log(&self) -> &[PeriodLog] {
        &self.action_log
    }

    /// The action log as `(aircraft, description)` string pairs.
    pub fn action_log_pairs(&self) -> Vec<Vec<(String, String)>> {
        self.action_log
            .iter()
            .map(|period| period.iter().map(ActionLogEntry::to_pair).collect())
            .collect()
    }

    /// Lifetime ops per spoke, in index order.
    pub fn ops_by_spoke(&self) -> Vec<u32> {
        self.network.ops_by_spoke()
    }

    /// Network-wide ops total: a zero sample for the start, then one after
    /// each committed period, most recent last.
    pub fn ops_total_history(&self) -> &[u64] {
        &self.ops_total_history
    }

    /// Violations found by the most recent audit.
    pub fn integrity_violations(&self) -> &[IntegrityViolation] {
        self.checker.violations()
    }

    /// Every period whose audit found a violation.
    pub fn violating_periods(&self) -> &[u64] {
        self.checker.violating_periods()
    }

    /// Every aircraft, in fleet order.
    pub fn fleet(&self) -> &[Aircraft] {
        &self.fleet
    }

    /// The spoke network.
    pub const fn network(&self) -> &SpokeNetwork {
        &self.network
    }

    /// The simulation clock.
    pub const fn clock(&self) -> SimClock {
        self.clock
    }

    /// The stage dispatch would use right now.
    pub fn stage(&self) -> Stage {
        self.network.detect_stage()
    }

    /// The configuration the simulation was built from.
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Stored snapshots.
    pub const fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    /// The smart targeting engine, whether or not it drives dispatch.
    pub const fn targeting(&self) -> &SmartTargeting {
        &self.targeting
    }

    /// Whether every configured period has run.
    pub const fn is_complete(&self) -> bool {
        self.clock.period() >= self.config.periods
    }

    /// Days of supply per resource at a spoke under the configured cadences.
    pub fn days_of_supply(&self, spoke: SpokeIdx) -> ResourceVec {
        self.network.days_of_supply(spoke, self.consumption.cadence())
    }

    /// Score every spoke from the hub for a hypothetical aircraft.
    ///
    /// Uses its own seeded generator, so calling it never changes what the
    /// next period does.
    pub fn debug_route_planning(&self, capacity: u32) -> RouteDebug {
        let seed = self.period_seed(self.clock.period()) ^ DEBUG_SEED_SALT;
        let mut rng = SmallRng::seed_from_u64(seed);
        self.targeting.debug_route_planning(
            Location::Hub,
            &self.network,
            self.stage(),
            capacity,
            &mut rng,
        )
    }

    fn period_seed(&self, period: u64) -> u64 {
        self.config.seed ^ period.wrapping_mul(PERIOD_SEED_MIX)
    }

    /// Phase 3: every aircraft acts once, in dispatch order.
    fn dispatch_fleet(&mut self, period: u64, stage: Stage) -> PeriodLog {
        let mut actions = PeriodLog::new();
        let mut claims = PeriodClaims::new();
        let mut rng = SmallRng::seed_from_u64(self.period_seed(period));

        for &idx in &self.dispatch {
            let Some(aircraft) = self.fleet.get_mut(idx) else {
                continue;
            };

            if aircraft.is_resting() {
                let action = aircraft.rest_one_period();
                actions.push(ActionLogEntry::new(aircraft.name.clone(), action));
                continue;
            }
            if aircraft.rest_due() {
                let action = aircraft.begin_rest();
                actions.push(ActionLogEntry::new(aircraft.name.clone(), action));
                continue;
            }

            if let Some(step) = aircraft.advance_sortie() {
                if let Some(offload) = step.offload {
                    self.network.queue_arrival(offload.spoke, offload.payload);
                    self.network.run_op(offload.spoke);
                }
                actions.extend(
                    step.actions
                        .into_iter()
                        .map(|action| ActionLogEntry::new(aircraft.name.clone(), action)),
                );
                continue;
            }

            if !aircraft.is_idle_at_hub() {
                continue;
            }
            let plan = if self.config.targeting.enabled {
                self.targeting.plan_route(
                    &self.network,
                    aircraft.capacity,
                    stage,
                    &mut claims,
                    &mut rng,
                )
            } else {
                self.scheduler
                    .assign(&self.network, aircraft.capacity, stage, &mut claims)
            };
            let Some(plan) = plan else {
                continue;
            };
            actions.extend(
                aircraft
                    .begin_sortie(plan.route, plan.leg1, plan.leg2)
                    .into_iter()
                    .map(|action| ActionLogEntry::new(aircraft.name.clone(), action)),
            );
        }
        actions
    }

    fn push_ops_sample(&mut self) {
        self.ops_total_history.push(self.network.ops_total());
        let limit = self.config.history.ops_history_limit.max(1);
        let excess = self.ops_total_history.len().saturating_sub(limit);
        if excess > 0 {
            self.ops_total_history.drain(..excess);
        }
    }

    fn capture(&self, period_actions: PeriodLog) -> Snapshot {
        Snapshot {
            clock: self.clock,
            network: self.network.clone(),
            fleet: self.fleet.clone(),
            pair_cursor: self.scheduler.cursor(),
            ops_total_history: self.ops_total_history.clone(),
            targeting: self.targeting.state().clone(),
            stuck_periods: self.stall.stuck_periods(),
            audit: self.checker.clone(),
            period_actions,
        }
    }

    /// Load a snapshot and rebuild the action log to match its period.
    fn apply(&mut self, snapshot: &Snapshot) {
        self.clock = snapshot.clock;
        self.network = snapshot.network.clone();
        self.fleet = snapshot.fleet.clone();
        self.scheduler.set_cursor(snapshot.pair_cursor);
        self.ops_total_history.clone_from(&snapshot.ops_total_history);
        self.targeting.restore_state(snapshot.targeting.clone());
        self.stall.restore(snapshot.stuck_periods);
        self.checker.rewind_to(&snapshot.audit);

        // Log entry k holds the actions of period k, stored in snapshot k + 1.
        let len = usize::try_from(snapshot.period()).unwrap_or(usize::MAX);
        self.action_log.truncate(len);
        while self.action_log.len() < len {
            let next = u64::try_from(self.action_log.len())
                .unwrap_or(u64::MAX)
                .saturating_add(1);
            let Some(stored) = self.history.get(next) else {
                break;
            };
            self.action_log.push(stored.period_actions.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cargosim_types::{AircraftAction, FlightPhase};

    use super::*;

    fn sim(config: SimConfig) -> Simulation {
        Simulation::new(config).unwrap()
    }

    fn advance(sim: &mut Simulation) -> PeriodReport {
        sim.step_period().unwrap().into_report().unwrap()
    }

    #[test]
    fn initial_snapshot_is_recorded() {
        let s = sim(SimConfig::default());
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.clock().period(), 0);
        assert!(s.action_log().is_empty());
        assert!(s.snapshot().period_actions.is_empty());
    }

    #[test]
    fn invalid_config_is_fatal() {
        let config = SimConfig {
            periods: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::Config(ConfigError::Invalid { .. }))
        ));

        let config = SimConfig {
            fleet_label: "1xA400".to_owned(),
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::Config(ConfigError::UnknownFleet(_)))
        ));
    }

    #[test]
    fn first_period_dispatches_and_logs() {
        let mut s = sim(SimConfig::default());
        let report = advance(&mut s);
        assert_eq!(report.period, 0);
        // Default stock [4,4,0,0]: stage Ops, both heavies depart.
        assert_eq!(report.stage, Stage::Ops);
        assert_eq!(report.actions.len(), 4);
        assert_eq!(
            report.actions.first().unwrap().action.to_string(),
            "ONLOAD@HUB→S1"
        );
        assert_eq!(s.action_log().len(), 1);
        assert_eq!(s.history().len(), 2);
        assert!(s.fleet().iter().all(|ac| ac.phase == FlightPhase::EnrouteLeg1));
    }

    #[test]
    fn complete_after_configured_periods() {
        let mut s = sim(SimConfig {
            periods: 2,
            ..SimConfig::default()
        });
        advance(&mut s);
        advance(&mut s);
        assert!(s.is_complete());
        assert_eq!(s.step_period().unwrap(), StepOutcome::Complete);
        assert_eq!(s.action_log().len(), 2);
    }

    #[test]
    fn step_back_pops_and_truncates_log() {
        let mut s = sim(SimConfig::default());
        for _ in 0..3 {
            advance(&mut s);
        }
        s.step_back().unwrap();
        assert_eq!(s.clock().period(), 2);
        assert_eq!(s.action_log().len(), 2);
        assert_eq!(s.history().len(), 3);

        s.step_back().unwrap();
        s.step_back().unwrap();
        assert_eq!(s.clock().period(), 0);
        assert!(matches!(
            s.step_back(),
            Err(SimError::History(HistoryError::NothingToStepBack))
        ));
    }

    #[test]
    fn restore_keeps_future_and_step_forward_replays() {
        let mut s = sim(SimConfig::default());
        for _ in 0..4 {
            advance(&mut s);
        }
        let log_at_four = s.action_log().to_vec();

        s.restore(1).unwrap();
        assert_eq!(s.action_log().len(), 1);
        assert_eq!(s.history().len(), 5);

        assert_eq!(
            s.step_forward().unwrap(),
            StepOutcome::Replayed { period: 2 }
        );
        s.restore(4).unwrap();
        assert_eq!(s.action_log(), log_at_four.as_slice());

        assert!(matches!(
            s.restore(9),
            Err(SimError::History(HistoryError::NoSnapshot { period: 9 }))
        ));
    }

    #[test]
    fn stepping_after_restore_discards_future() {
        let mut s = sim(SimConfig::default());
        for _ in 0..4 {
            advance(&mut s);
        }
        s.restore(2).unwrap();
        advance(&mut s);
        assert_eq!(s.history().len(), 4);
        assert_eq!(s.history().latest().unwrap().period(), 3);
    }

    #[test]
    fn stall_breaker_forces_sortie_when_nothing_happens() {
        // Fully stocked network: nothing to carry, no offloads, no ops.
        let config = SimConfig {
            initial_stock: ResourceVec::new(50.0, 50.0, 50.0, 50.0),
            ..SimConfig::default()
        };
        let mut s = sim(config);
        let mut forced = None;
        for _ in 0..6 {
            let report = advance(&mut s);
            if report.forced_sortie {
                forced = Some(report);
                break;
            }
        }
        let report = forced.unwrap();
        // Periods 1, 2, 3 are stuck; the breaker fires at the end of 3.
        assert_eq!(report.period, 3);
        let entry = report.actions.last().unwrap();
        assert_eq!(entry.aircraft, "C-130 #1");
        assert!(matches!(entry.action, AircraftAction::ForcedMove { .. }));
        assert_eq!(s.snapshot().period_actions, report.actions);
    }

    #[test]
    fn reset_returns_to_period_zero() {
        let mut s = sim(SimConfig::default());
        advance(&mut s);
        advance(&mut s);
        s.reset().unwrap();
        assert_eq!(s.clock().period(), 0);
        assert!(s.action_log().is_empty());
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.ops_by_spoke(), vec![0; 10]);
    }

    #[test]
    fn ops_history_starts_with_zero_sample() {
        let mut s = sim(SimConfig::default());
        assert_eq!(s.ops_total_history(), &[0]);
        advance(&mut s);
        assert_eq!(s.ops_total_history().len(), 2);
        assert_eq!(s.ops_total_history().first(), Some(&0));
    }

    #[test]
    fn ops_history_is_trimmed() {
        let mut config = SimConfig::default();
        config.history.ops_history_limit = 3;
        let mut s = sim(config);
        for _ in 0..6 {
            advance(&mut s);
        }
        assert_eq!(s.ops_total_history().len(), 3);
    }

    #[test]
    fn debug_route_planning_does_not_disturb_state() {
        let mut a = sim(SimConfig::default());
        let mut b = sim(SimConfig::default());
        let report = a.debug_route_planning(6);
        assert_eq!(report.spokes.len(), 10);
        assert_eq!(advance(&mut a), advance(&mut b));
    }

    #[test]
    fn simulation_can_move_to_another_thread() {
        const fn assert_send<T: Send>() {}
        assert_send::<Simulation>();
    }
}
