//! Stage-aware cargo allocation for a one- or two-spoke sortie.
//!
//! Given the first spoke `i`, an optional second spoke `j`, the aircraft's
//! capacity, and the current [`Stage`], the planner fills payloads greedily
//! in the stage's priority order. A deficit is the shortfall below
//! [`MIN_LEVEL`]; a buffer tops stock up to [`BUFFER_LEVEL`], counting any
//! cargo of that resource already planned for the same spoke.
//!
//! | Stage | Order of gives |
//! |-------|----------------|
//! | A | A deficits (i, j), B deficits (i, j), A buffer (i, j) |
//! | B | B deficits (i, j), A buffer (i, j) |
//! | Ops | C deficits (i, j), D deficits (i, j), C buffer (i, j), D buffer (i, j) |
//!
//! Needs are computed from resident stock at the start of planning.
//! Component-wise, the two payloads never sum to more than the capacity.

use cargosim_types::{Resource, ResourceVec, Route, SpokeIdx, Stage};
use cargosim_world::SpokeNetwork;

/// Stock level below which a spoke counts as lacking a resource.
pub const MIN_LEVEL: f64 = 1.0;

/// Level the planner tops a spoke up to once deficits are covered.
pub const BUFFER_LEVEL: f64 = 2.0;

/// A planned split of cargo across the legs of a sortie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    /// The route after collapsing an empty second leg.
    pub route: Route,
    /// Cargo for the first spoke.
    pub leg1: ResourceVec,
    /// Cargo for the second spoke. Zero for single-leg routes.
    pub leg2: ResourceVec,
}

impl Allocation {
    /// Total cargo across both legs.
    pub fn total(&self) -> f64 {
        self.leg1.total() + self.leg2.total()
    }

    /// Whether the allocation carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.leg1.is_empty() && self.leg2.is_empty()
    }
}

/// Which leg a give targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    First,
    Second,
}

/// Greedy payload builder with a shrinking capacity budget.
struct Loader {
    remaining: f64,
    leg1: ResourceVec,
    leg2: ResourceVec,
}

impl Loader {
    fn payload(&self, leg: Leg) -> &ResourceVec {
        match leg {
            Leg::First => &self.leg1,
            Leg::Second => &self.leg2,
        }
    }

    fn give(&mut self, leg: Leg, resource: Resource, need: f64) {
        if need <= 0.0 || self.remaining <= 0.0 {
            return;
        }
        let amount = need.min(self.remaining);
        match leg {
            Leg::First => self.leg1.add_amount(resource, amount),
            Leg::Second => self.leg2.add_amount(resource, amount),
        }
        self.remaining -= amount;
    }
}

fn deficit(stock: &ResourceVec, resource: Resource) -> f64 {
    (MIN_LEVEL - stock.get(resource)).max(0.0)
}

/// Plan cargo for a sortie to `first` and optionally `second`.
///
/// If the second leg ends up empty the route collapses to
/// [`Route::Single`].
pub fn plan_allocation(
    network: &SpokeNetwork,
    first: SpokeIdx,
    second: Option<SpokeIdx>,
    capacity: u32,
    stage: Stage,
) -> Allocation {
    let stock_i = network.stock(first);
    let stock_j = second.map(|j| network.stock(j));

    // Each target is a leg paired with that spoke's resident stock.
    let mut targets = vec![(Leg::First, stock_i)];
    if let Some(stock_j) = stock_j {
        targets.push((Leg::Second, stock_j));
    }

    let mut loader = Loader {
        remaining: f64::from(capacity),
        leg1: ResourceVec::ZERO,
        leg2: ResourceVec::ZERO,
    };

    let fill_deficits = |loader: &mut Loader, resource: Resource| {
        for (leg, stock) in &targets {
            loader.give(*leg, resource, deficit(stock, resource));
        }
    };
    let fill_buffer = |loader: &mut Loader, resource: Resource, count_planned: bool| {
        for (leg, stock) in &targets {
            let planned = if count_planned {
                loader.payload(*leg).get(resource)
            } else {
                0.0
            };
            let need = (BUFFER_LEVEL - (stock.get(resource) + planned)).max(0.0);
            loader.give(*leg, resource, need);
        }
    };

    match stage {
        Stage::A => {
            fill_deficits(&mut loader, Resource::A);
            fill_deficits(&mut loader, Resource::B);
            fill_buffer(&mut loader, Resource::A, true);
        }
        Stage::B => {
            fill_deficits(&mut loader, Resource::B);
            fill_buffer(&mut loader, Resource::A, false);
        }
        Stage::Ops => {
            fill_deficits(&mut loader, Resource::C);
            fill_deficits(&mut loader, Resource::D);
            fill_buffer(&mut loader, Resource::C, true);
            fill_buffer(&mut loader, Resource::D, true);
        }
    }

    let route = match second {
        Some(j) if !loader.leg2.is_empty() => Route::Pair(first, j),
        _ => Route::Single(first),
    };
    Allocation {
        route,
        leg1: loader.leg1,
        leg2: loader.leg2,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn spoke(i: usize) -> SpokeIdx {
        SpokeIdx::new(i).unwrap()
    }

    #[test]
    fn stage_a_fills_a_then_b_then_buffers_a() {
        let net = SpokeNetwork::new(ResourceVec::ZERO);
        let plan = plan_allocation(&net, spoke(0), Some(spoke(1)), 6, Stage::A);
        assert_eq!(plan.route, Route::Pair(spoke(0), spoke(1)));
        assert_eq!(plan.leg1, ResourceVec::new(2.0, 1.0, 0.0, 0.0));
        assert_eq!(plan.leg2, ResourceVec::new(2.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn small_capacity_serves_first_spoke_first() {
        let net = SpokeNetwork::new(ResourceVec::ZERO);
        let plan = plan_allocation(&net, spoke(2), Some(spoke(3)), 3, Stage::A);
        // A to both, then B to the first spoke only.
        assert_eq!(plan.leg1, ResourceVec::new(1.0, 1.0, 0.0, 0.0));
        assert_eq!(plan.leg2, ResourceVec::new(1.0, 0.0, 0.0, 0.0));
        assert!((plan.total() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn stage_b_buffers_a_against_stock_only() {
        let net = SpokeNetwork::new(ResourceVec::new(1.0, 0.0, 0.0, 0.0));
        let plan = plan_allocation(&net, spoke(0), None, 6, Stage::B);
        assert_eq!(plan.route, Route::Single(spoke(0)));
        assert_eq!(plan.leg1, ResourceVec::new(1.0, 1.0, 0.0, 0.0));
        assert!(plan.leg2.is_empty());
    }

    #[test]
    fn ops_stage_fills_c_and_d() {
        let net = SpokeNetwork::new(ResourceVec::new(2.0, 2.0, 0.0, 0.0));
        let plan = plan_allocation(&net, spoke(0), Some(spoke(1)), 6, Stage::Ops);
        // Deficits: C i, C j, D i, D j (4 units). Buffers: C i, C j (2 units).
        assert_eq!(plan.leg1, ResourceVec::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(plan.leg2, ResourceVec::new(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn empty_second_leg_collapses_route() {
        let mut net = SpokeNetwork::new(ResourceVec::new(3.0, 3.0, 3.0, 3.0));
        net.set_stock(spoke(4), ResourceVec::new(0.0, 3.0, 3.0, 3.0));
        let plan = plan_allocation(&net, spoke(4), Some(spoke(5)), 6, Stage::A);
        assert_eq!(plan.route, Route::Single(spoke(4)));
        assert_eq!(plan.leg1, ResourceVec::new(2.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn fully_stocked_pair_plans_nothing() {
        let net = SpokeNetwork::new(ResourceVec::new(3.0, 3.0, 3.0, 3.0));
        let plan = plan_allocation(&net, spoke(0), Some(spoke(1)), 6, Stage::Ops);
        assert!(plan.is_empty());
    }

    #[test]
    fn payload_never_exceeds_capacity() {
        let net = SpokeNetwork::new(ResourceVec::ZERO);
        for capacity in 0..10 {
            for stage in [Stage::A, Stage::B, Stage::Ops] {
                let plan = plan_allocation(&net, spoke(0), Some(spoke(9)), capacity, stage);
                assert!(plan.total() <= f64::from(capacity) + 1e-9);
            }
        }
    }
}
