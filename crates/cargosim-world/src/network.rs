//! The spoke network: resident stock, pending arrivals, and ops counters.
//!
//! Cargo offloaded at a spoke does not become usable immediately. It is
//! queued in the spoke's `pending` list and only merged into resident
//! `stock` at the start of the next period by
//! [`SpokeNetwork::apply_arrivals`]. The operational gate and every
//! allocation decision look at resident stock only.
//!
//! The `operational` flag on each [`Spoke`] is a derived cache refreshed
//! once per period by [`SpokeNetwork::refresh_operational`]. It is never
//! authoritative; the audit compares it against the live gate.

use cargosim_types::{
    EPSILON, Resource, ResourceVec, SPOKE_COUNT, SpokeIdx, Stage, is_ops_capable,
};
use serde::{Deserialize, Serialize};

use crate::consumption::ConsumptionConfig;
use crate::error::WorldError;

/// State of a single spoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spoke {
    /// Resident stock available this period.
    pub stock: ResourceVec,
    /// Cached operational gate, refreshed at the end of each period.
    pub operational: bool,
    /// Lifetime operations performed at this spoke.
    pub ops_count: u32,
    /// Offloaded cargo that becomes resident next period.
    pub pending: Vec<ResourceVec>,
}

impl Spoke {
    fn new(stock: ResourceVec) -> Self {
        Self {
            stock,
            operational: false,
            ops_count: 0,
            pending: Vec::new(),
        }
    }

    /// Sum of all cargo queued for next-period arrival.
    pub fn pending_total(&self) -> ResourceVec {
        self.pending
            .iter()
            .fold(ResourceVec::ZERO, |acc, payload| acc + *payload)
    }
}

/// All ten spokes of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokeNetwork {
    spokes: Vec<Spoke>,
}

impl SpokeNetwork {
    /// Create a network where every spoke starts with the same stock.
    ///
    /// Operational flags start cleared; call
    /// [`refresh_operational`](Self::refresh_operational) to derive them.
    pub fn new(initial: ResourceVec) -> Self {
        Self {
            spokes: (0..SPOKE_COUNT).map(|_| Spoke::new(initial)).collect(),
        }
    }

    /// All spokes in index order.
    pub fn spokes(&self) -> &[Spoke] {
        &self.spokes
    }

    /// A single spoke.
    pub fn spoke(&self, idx: SpokeIdx) -> Option<&Spoke> {
        self.spokes.get(idx.index())
    }

    /// A single spoke by raw 0-based index.
    pub fn spoke_by_index(&self, index: usize) -> Result<&Spoke, WorldError> {
        self.spokes
            .get(index)
            .ok_or(WorldError::SpokeOutOfRange(index))
    }

    fn spoke_mut(&mut self, idx: SpokeIdx) -> Option<&mut Spoke> {
        self.spokes.get_mut(idx.index())
    }

    /// Resident stock at a spoke.
    pub fn stock(&self, idx: SpokeIdx) -> ResourceVec {
        self.spoke(idx).map_or(ResourceVec::ZERO, |s| s.stock)
    }

    /// Overwrite the resident stock at a spoke.
    ///
    /// The operational flag is left as-is until the next refresh.
    pub fn set_stock(&mut self, idx: SpokeIdx, stock: ResourceVec) {
        if let Some(spoke) = self.spoke_mut(idx) {
            spoke.stock = stock;
        }
    }

    /// Mutable access to resident stock, for in-place draw-down.
    pub(crate) fn stock_mut(&mut self) -> impl Iterator<Item = &mut ResourceVec> {
        self.spokes.iter_mut().map(|s| &mut s.stock)
    }

    /// The operational gate evaluated on resident stock.
    pub fn is_ops_capable(&self, idx: SpokeIdx) -> bool {
        self.spoke(idx).is_some_and(|s| is_ops_capable(&s.stock))
    }

    /// Queue offloaded cargo for arrival at the start of next period.
    pub fn queue_arrival(&mut self, idx: SpokeIdx, payload: ResourceVec) {
        if let Some(spoke) = self.spoke_mut(idx) {
            spoke.pending.push(payload);
        }
    }

    /// Merge every pending arrival into resident stock.
    ///
    /// Returns the number of payloads that landed.
    pub fn apply_arrivals(&mut self) -> usize {
        let mut landed: usize = 0;
        for spoke in &mut self.spokes {
            for payload in spoke.pending.drain(..) {
                spoke.stock += payload;
                landed = landed.saturating_add(1);
            }
        }
        landed
    }

    /// Perform one operation at a spoke if it is currently ops-capable.
    ///
    /// An operation draws one unit each of C and D (clamped at zero) and
    /// increments the spoke's ops counter. Returns whether it ran.
    pub fn run_op(&mut self, idx: SpokeIdx) -> bool {
        let Some(spoke) = self.spoke_mut(idx) else {
            return false;
        };
        if !is_ops_capable(&spoke.stock) {
            return false;
        }
        spoke.stock.draw_one(Resource::C);
        spoke.stock.draw_one(Resource::D);
        spoke.ops_count = spoke.ops_count.saturating_add(1);
        true
    }

    /// Global scheduling stage derived from resident stock.
    pub fn detect_stage(&self) -> Stage {
        let lacks = |r: Resource| self.spokes.iter().any(|s| s.stock.get(r) <= EPSILON);
        if lacks(Resource::A) {
            Stage::A
        } else if lacks(Resource::B) {
            Stage::B
        } else {
            Stage::Ops
        }
    }

    /// Recompute every spoke's cached operational flag.
    pub fn refresh_operational(&mut self) {
        for spoke in &mut self.spokes {
            spoke.operational = is_ops_capable(&spoke.stock);
        }
    }

    /// Number of spokes whose cached flag is set.
    pub fn operational_count(&self) -> usize {
        self.spokes.iter().filter(|s| s.operational).count()
    }

    /// Lifetime ops per spoke, in index order.
    pub fn ops_by_spoke(&self) -> Vec<u32> {
        self.spokes.iter().map(|s| s.ops_count).collect()
    }

    /// Lifetime ops across the whole network.
    pub fn ops_total(&self) -> u64 {
        self.spokes.iter().map(|s| u64::from(s.ops_count)).sum()
    }

    /// Days of supply per resource at a spoke: resident units times the
    /// days each unit lasts under the configured cadence.
    pub fn days_of_supply(&self, idx: SpokeIdx, cadence: &ConsumptionConfig) -> ResourceVec {
        let stock = self.stock(idx);
        let mut dos = ResourceVec::ZERO;
        for (resource, amount) in stock.iter() {
            dos.set(resource, amount * f64::from(cadence.days(resource)));
        }
        dos
    }
}
