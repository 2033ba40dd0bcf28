//! Identical configurations produce identical runs, and rewinding then
//! moving forward reproduces the first run.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use cargosim_core::history::Snapshot;
use cargosim_core::{SimConfig, Simulation, StepOutcome};
use cargosim_types::{PeriodLog, ResourceVec};

fn targeted_config() -> SimConfig {
    let mut config = SimConfig {
        fleet_label: "2xC130_2xC27".to_owned(),
        initial_stock: ResourceVec::new(1.0, 0.0, 0.0, 0.0),
        ..SimConfig::default()
    };
    config.targeting.enabled = true;
    config
}

fn run(config: SimConfig, periods: u64) -> (Vec<PeriodLog>, Snapshot) {
    let mut sim = Simulation::new(config).unwrap();
    for _ in 0..periods {
        sim.step_period().unwrap();
    }
    (sim.action_log().to_vec(), sim.snapshot())
}

#[test]
fn deterministic_runs_match() {
    for config in [SimConfig::default(), targeted_config()] {
        let (log_a, snap_a) = run(config.clone(), 40);
        let (log_b, snap_b) = run(config, 40);
        assert_eq!(log_a, log_b);
        assert_eq!(snap_a, snap_b);
    }
}

#[test]
fn different_seeds_still_run_cleanly() {
    let mut config = targeted_config();
    config.seed = 7;
    let mut sim = Simulation::new(config).unwrap();
    for _ in 0..30 {
        sim.step_period().unwrap();
    }
    assert!(sim.violating_periods().is_empty());
}

#[test]
fn restore_then_replay_matches_first_run() {
    for config in [SimConfig::default(), targeted_config()] {
        let (log, snapshot) = run(config.clone(), 20);

        let mut sim = Simulation::new(config).unwrap();
        for _ in 0..20 {
            sim.step_period().unwrap();
        }
        sim.restore(8).unwrap();
        for k in 9..=20 {
            assert_eq!(sim.step_forward().unwrap(), StepOutcome::Replayed { period: k });
        }
        assert_eq!(sim.action_log(), log.as_slice());
        assert_eq!(sim.snapshot(), snapshot);
    }
}

#[test]
fn recompute_after_step_back_matches_first_run() {
    for config in [SimConfig::default(), targeted_config()] {
        let (log, snapshot) = run(config.clone(), 20);

        let mut sim = Simulation::new(config).unwrap();
        for _ in 0..12 {
            sim.step_period().unwrap();
        }
        for _ in 0..4 {
            sim.step_back().unwrap();
        }
        assert_eq!(sim.clock().period(), 8);
        for _ in 0..12 {
            let outcome = sim.step_forward().unwrap();
            assert!(matches!(outcome, StepOutcome::Advanced(_)));
        }
        assert_eq!(sim.action_log(), log.as_slice());
        assert_eq!(sim.snapshot(), snapshot);
    }
}

#[test]
fn bounded_history_still_steps_back() {
    let mut config = SimConfig::default();
    config.history.max_snapshots = Some(4);
    let mut sim = Simulation::new(config).unwrap();
    for _ in 0..10 {
        sim.step_period().unwrap();
    }
    assert_eq!(sim.history().len(), 4);
    sim.step_back().unwrap();
    sim.step_back().unwrap();
    sim.step_back().unwrap();
    assert_eq!(sim.clock().period(), 7);
    assert!(sim.step_back().is_err());
    assert_eq!(sim.action_log().len(), 7);
}
