//! Properties that must hold after every period, for every fleet and
//! both dispatch strategies.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::collections::BTreeSet;

use cargosim_core::{PeriodReport, SimConfig, Simulation};
use cargosim_types::{AircraftAction, EPSILON, Resource, ResourceVec, is_ops_capable};

fn configs() -> Vec<SimConfig> {
    let mut out = Vec::new();
    for label in ["2xC130", "4xC130", "2xC130_2xC27"] {
        for targeting in [false, true] {
            for stock in [
                ResourceVec::ZERO,
                ResourceVec::new(4.0, 4.0, 0.0, 0.0),
                ResourceVec::new(2.0, 2.0, 2.0, 2.0),
            ] {
                let mut config = SimConfig {
                    fleet_label: label.to_owned(),
                    initial_stock: stock,
                    ..SimConfig::default()
                };
                config.targeting.enabled = targeting;
                out.push(config);
            }
        }
    }
    out
}

fn check_period(sim: &Simulation, report: &PeriodReport) {
    for (i, s) in sim.network().spokes().iter().enumerate() {
        for (resource, amount) in s.stock.iter() {
            assert!(amount >= -EPSILON, "S{} {resource} = {amount}", i + 1);
        }
        assert_eq!(s.operational, is_ops_capable(&s.stock), "S{} gate", i + 1);
    }

    for ac in sim.fleet() {
        assert!(ac.loaded_total() <= f64::from(ac.capacity) + EPSILON);
        if ac.rest_cooldown > 0 {
            assert!(ac.at_hub());
        }
    }

    let departed: BTreeSet<&str> = report
        .actions
        .iter()
        .filter(|e| matches!(e.action, AircraftAction::Onload { .. }))
        .map(|e| e.aircraft.as_str())
        .collect();
    let mut keys = BTreeSet::new();
    for ac in sim.fleet().iter().filter(|ac| departed.contains(ac.name.as_str())) {
        let key = ac.route.unwrap().pairing_key();
        assert!(keys.insert(key), "pairing key {key:?} claimed twice");
    }

    let day = report.period / 2;
    for resource in Resource::ALL {
        let cadence = u64::from(sim.config().consumption.days(resource));
        let due = report.period % 2 == 1 && day % cadence == cadence - 1;
        assert_eq!(report.consumed.contains(&resource), due, "{resource} at {}", report.period);
    }

    assert!(report.violations.is_empty(), "{:?}", report.violations);
}

#[test]
fn invariants_hold_every_period() {
    for config in configs() {
        let mut sim = Simulation::new(config).unwrap();
        while let Some(report) = sim.step_period().unwrap().into_report() {
            check_period(&sim, &report);
        }
        assert!(sim.is_complete());
        assert!(sim.violating_periods().is_empty());
        assert_eq!(sim.action_log().len(), 60);
        assert_eq!(sim.ops_total_history().len(), 61);
        assert_eq!(sim.ops_total_history().first(), Some(&0));
    }
}

#[test]
fn ops_history_tracks_network_total() {
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    for _ in 0..40 {
        sim.step_period().unwrap();
    }
    let total: u64 = sim.ops_by_spoke().iter().map(|&n| u64::from(n)).sum();
    assert_eq!(sim.ops_total_history().last(), Some(&total));
    assert!(sim.ops_total_history().windows(2).all(|w| w.first() <= w.get(1)));
}

#[test]
fn action_log_pairs_use_display_vocabulary() {
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    sim.step_period().unwrap();
    let pairs = sim.action_log_pairs();
    let first = pairs.first().unwrap();
    assert_eq!(
        first.first().unwrap(),
        &("C-130 #1".to_owned(), "ONLOAD@HUB→S1".to_owned())
    );
    assert_eq!(first.get(1).unwrap().1, "MOVE HUB→S1");
}
