//! Pure integrity checks over one period.
//!
//! The ops check compares against a baseline taken after arrivals land and
//! before any aircraft acts. Arrivals can legitimately raise C and D, so a
//! baseline taken earlier would hide real draws behind new stock.

use cargosim_fleet::Aircraft;
use cargosim_types::{EPSILON, Resource, SpokeIdx, is_ops_capable};
use cargosim_world::SpokeNetwork;
use serde::Serialize;

/// Float tolerance when comparing C/D drops to the ops delta.
pub const OPS_TOLERANCE: f64 = 1e-6;

/// A single detected inconsistency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IntegrityViolation {
    /// A stock component fell below `-EPSILON`.
    NegativeStock {
        /// The spoke holding negative stock.
        spoke: SpokeIdx,
        /// The resource that went negative.
        resource: Resource,
        /// The offending amount.
        amount: f64,
    },
    /// The cached operational flag disagrees with the live gate.
    OperationalMismatch {
        /// The spoke whose flag is stale.
        spoke: SpokeIdx,
        /// The cached flag.
        cached: bool,
        /// The gate recomputed from resident stock.
        live: bool,
    },
    /// Ops increased without a matching draw of C and D.
    OpsWithoutConsumption {
        /// The spoke that reported the ops.
        spoke: SpokeIdx,
        /// Ops performed this period.
        ops_delta: u32,
        /// Units of C drawn this period.
        c_drop: f64,
        /// Units of D drawn this period.
        d_drop: f64,
    },
    /// An aircraft is carrying more than its capacity.
    PayloadOverCapacity {
        /// The overloaded aircraft.
        aircraft: String,
        /// Cargo loaded across both legs.
        loaded: f64,
        /// The aircraft's capacity.
        capacity: u32,
    },
}

impl core::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NegativeStock {
                spoke,
                resource,
                amount,
            } => write!(f, "negative stock at {spoke}: {resource}={amount}"),
            Self::OperationalMismatch { spoke, .. } => write!(f, "ops-cap mismatch at {spoke}"),
            Self::OpsWithoutConsumption { spoke, .. } => {
                write!(f, "C/D not consumed for ops at {spoke}")
            }
            Self::PayloadOverCapacity {
                aircraft,
                loaded,
                capacity,
            } => write!(f, "{aircraft} carries {loaded} over capacity {capacity}"),
        }
    }
}

/// Per-spoke state captured after arrivals and before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditBaseline {
    c_stock: Vec<f64>,
    d_stock: Vec<f64>,
    ops: Vec<u32>,
}

impl AuditBaseline {
    /// Capture the baseline from the network's current state.
    pub fn capture(network: &SpokeNetwork) -> Self {
        let spokes = network.spokes();
        Self {
            c_stock: spokes.iter().map(|s| s.stock.get(Resource::C)).collect(),
            d_stock: spokes.iter().map(|s| s.stock.get(Resource::D)).collect(),
            ops: spokes.iter().map(|s| s.ops_count).collect(),
        }
    }
}

/// Run every check for one period and return all violations found.
pub fn verify_period(
    baseline: &AuditBaseline,
    network: &SpokeNetwork,
    fleet: &[Aircraft],
) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();

    for (idx, spoke) in SpokeIdx::all().zip(network.spokes()) {
        for (resource, amount) in spoke.stock.iter() {
            if amount < -EPSILON {
                violations.push(IntegrityViolation::NegativeStock {
                    spoke: idx,
                    resource,
                    amount,
                });
            }
        }

        let live = is_ops_capable(&spoke.stock);
        if spoke.operational != live {
            violations.push(IntegrityViolation::OperationalMismatch {
                spoke: idx,
                cached: spoke.operational,
                live,
            });
        }

        let before_ops = baseline.ops.get(idx.index()).copied().unwrap_or(0);
        let ops_delta = spoke.ops_count.saturating_sub(before_ops);
        if ops_delta > 0 {
            let c_before = baseline.c_stock.get(idx.index()).copied().unwrap_or(0.0);
            let d_before = baseline.d_stock.get(idx.index()).copied().unwrap_or(0.0);
            let c_drop = c_before - spoke.stock.get(Resource::C);
            let d_drop = d_before - spoke.stock.get(Resource::D);
            let required = f64::from(ops_delta) - OPS_TOLERANCE;
            if c_drop < required || d_drop < required {
                violations.push(IntegrityViolation::OpsWithoutConsumption {
                    spoke: idx,
                    ops_delta,
                    c_drop,
                    d_drop,
                });
            }
        }
    }

    for aircraft in fleet {
        let loaded = aircraft.loaded_total();
        if loaded > f64::from(aircraft.capacity) + EPSILON {
            violations.push(IntegrityViolation::PayloadOverCapacity {
                aircraft: aircraft.name.clone(),
                loaded,
                capacity: aircraft.capacity,
            });
        }
    }

    violations
}
