//! Scoring-based route selection ("smart targeting").
//!
//! An alternative to the round-robin [`PairingScheduler`]: every candidate
//! spoke is scored as benefit minus cost, and an aircraft flies to the
//! best-scoring spoke that yields cargo, optionally continuing to a second
//! spoke when that leg scores above a threshold.
//!
//! # Benefit
//!
//! - `need`: total shortfall below one unit across A-D, divided by four
//!   and clamped to `[0, 1]`.
//! - `ops_gain`: shortfall of the resource class that matters for the
//!   current stage (A, B, or the mean of C and D).
//! - When a spoke has no shortfall at all, a maintenance fallback keeps
//!   it attractive: closeness to the `(2, 2, 1, 1)` reference level,
//!   readiness (smallest component), and a small index-based spread,
//!   floored at `0.1`.
//!
//! # Cost
//!
//! - `distance`: leg length over the P90 reference distance.
//! - `congestion`: aircraft already reserved for the spoke this period.
//! - `fairness`: decaying count of recent visits, tripled when the spoke
//!   is already well stocked.
//!
//! # Score
//!
//! ```text
//! base  = w_ops * ops_gain + w_need * need
//!       - w_dist * distance - w_cong * congestion - w_cong * fairness
//! score = base * uniform(1 - jitter, 1 + jitter)
//! ```
//!
//! The stage bumps `w_need` (A, B) or `w_ops` (Ops) by 20%; second legs
//! scale both benefit weights by `second_leg_multiplier`. The jitter only
//! separates near-ties; its generator is supplied by the caller so a
//! given seed and period always produce the same draws.
//!
//! [`PairingScheduler`]: crate::scheduler::PairingScheduler

use cargosim_types::{Location, Resource, ResourceVec, SPOKE_COUNT, SpokeIdx, Stage};
use cargosim_world::{Geometry, SpokeNetwork};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::planner::{Allocation, plan_allocation};
use crate::scheduler::PeriodClaims;

/// Reference level used by the maintenance fallback, in `A, B, C, D` order.
const MAINTENANCE_LEVEL: ResourceVec = ResourceVec::new(2.0, 2.0, 1.0, 1.0);

/// Stage emphasis applied to the favoured benefit weight.
const STAGE_EMPHASIS: f64 = 1.2;

/// Floor for fallback benefit scores.
const FALLBACK_FLOOR: f64 = 0.1;

/// Congestion penalty once a spoke's reservation cap is reached.
const HARD_CONGESTION: f64 = 2.0;

/// Congestion penalty per existing reservation.
const SOFT_CONGESTION: f64 = 0.5;

/// Total stock at which a spoke counts as well supplied for fairness.
const PLENTIFUL_STOCK: f64 = 6.0;

/// Tunable weights and thresholds for smart targeting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetingConfig {
    /// Use smart targeting instead of the round-robin scheduler.
    #[serde(default)]
    pub enabled: bool,

    /// Weight of the stage-specific ops-unlock benefit (default: 1.0).
    #[serde(default = "default_w_ops")]
    pub w_ops: f64,

    /// Weight of the overall need benefit (default: 0.6).
    #[serde(default = "default_w_need")]
    pub w_need: f64,

    /// Weight of the normalised distance cost (default: 0.8).
    #[serde(default = "default_w_dist")]
    pub w_dist: f64,

    /// Weight of the congestion and fairness costs (default: 0.7).
    #[serde(default = "default_w_cong")]
    pub w_cong: f64,

    /// Hard cap on aircraft reserved for one spoke per period (default: none).
    #[serde(default)]
    pub max_aircraft_per_spoke: Option<u32>,

    /// Benefit-weight multiplier for second legs (default: 0.7).
    #[serde(default = "default_second_leg_multiplier")]
    pub second_leg_multiplier: f64,

    /// Minimum score a second leg needs to be flown (default: 0.1).
    #[serde(default = "default_second_leg_threshold")]
    pub second_leg_threshold: f64,

    /// Fixed distance normaliser; `None` uses the map's P90 distance.
    #[serde(default)]
    pub distance_normalizer: Option<f64>,

    /// Per-period retention factor of the recent-service counter (default: 0.8).
    #[serde(default = "default_fairness_decay")]
    pub fairness_decay: f64,

    /// Relative score jitter for tie-breaking (default: 0.01).
    #[serde(default = "default_jitter_percent")]
    pub jitter_percent: f64,
}

impl TargetingConfig {
    /// Every float parameter with its name, for validation.
    pub fn float_parameters(&self) -> [(&'static str, f64); 8] {
        [
            ("w_ops", self.w_ops),
            ("w_need", self.w_need),
            ("w_dist", self.w_dist),
            ("w_cong", self.w_cong),
            ("second_leg_multiplier", self.second_leg_multiplier),
            ("second_leg_threshold", self.second_leg_threshold),
            ("fairness_decay", self.fairness_decay),
            ("jitter_percent", self.jitter_percent),
        ]
    }
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            w_ops: default_w_ops(),
            w_need: default_w_need(),
            w_dist: default_w_dist(),
            w_cong: default_w_cong(),
            max_aircraft_per_spoke: None,
            second_leg_multiplier: default_second_leg_multiplier(),
            second_leg_threshold: default_second_leg_threshold(),
            distance_normalizer: None,
            fairness_decay: default_fairness_decay(),
            jitter_percent: default_jitter_percent(),
        }
    }
}

const fn default_w_ops() -> f64 {
    1.0
}

const fn default_w_need() -> f64 {
    0.6
}

const fn default_w_dist() -> f64 {
    0.8
}

const fn default_w_cong() -> f64 {
    0.7
}

const fn default_second_leg_multiplier() -> f64 {
    0.7
}

const fn default_second_leg_threshold() -> f64 {
    0.1
}

const fn default_fairness_decay() -> f64 {
    0.8
}

const fn default_jitter_percent() -> f64 {
    0.01
}

/// Benefit signals for one spoke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpokeBenefit {
    /// How short of supply the spoke is, in `[0, 1]`.
    pub need: f64,
    /// How much a delivery helps the current stage, in `[0, 1]`.
    pub ops_gain: f64,
    /// Mean of `need` and `ops_gain`.
    pub marginal: f64,
}

/// Cost signals for one spoke from a given origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpokeCost {
    /// Leg length over the reference distance.
    pub distance: f64,
    /// Penalty for aircraft already reserved this period.
    pub congestion: f64,
    /// Penalty for recent visits.
    pub fairness: f64,
}

/// Weighted components behind a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// `w_ops * ops_gain` after stage and leg scaling.
    pub ops: f64,
    /// `w_need * need` after stage and leg scaling.
    pub need: f64,
    /// `-w_dist * distance`.
    pub distance: f64,
    /// `-w_cong * congestion`.
    pub congestion: f64,
    /// `-w_cong * fairness`.
    pub fairness: f64,
    /// Multiplicative jitter drawn for this score.
    pub jitter: f64,
}

/// A scored candidate leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegScore {
    /// Candidate destination.
    pub spoke: SpokeIdx,
    /// Final jittered score.
    pub score: f64,
    /// Benefit inputs.
    pub benefit: SpokeBenefit,
    /// Cost inputs.
    pub cost: SpokeCost,
    /// Weighted components.
    pub breakdown: ScoreBreakdown,
}

/// One spoke's row in a route-planning debug report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpokeDebug {
    /// The spoke.
    pub spoke: SpokeIdx,
    /// Resident stock.
    pub stock: ResourceVec,
    /// Scored leg from the requested origin.
    pub leg: LegScore,
}

/// Full scoring picture for one hypothetical aircraft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDebug {
    /// Stage the scores were computed for.
    pub stage: Stage,
    /// Origin of the hypothetical leg.
    pub origin: Location,
    /// Capacity of the hypothetical aircraft.
    pub capacity: u32,
    /// Every spoke, best score first.
    pub spokes: Vec<SpokeDebug>,
}

/// Mutable per-run targeting memory, captured in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingState {
    recent_service: Vec<u32>,
    reservations: Vec<u32>,
}

impl TargetingState {
    fn new() -> Self {
        Self {
            recent_service: vec![0; SPOKE_COUNT],
            reservations: vec![0; SPOKE_COUNT],
        }
    }

    /// Recent-service counter for a spoke.
    pub fn recent_service(&self, spoke: SpokeIdx) -> u32 {
        self.recent_service.get(spoke.index()).copied().unwrap_or(0)
    }

    /// Aircraft reserved for a spoke in the current period.
    pub fn reservations(&self, spoke: SpokeIdx) -> u32 {
        self.reservations.get(spoke.index()).copied().unwrap_or(0)
    }
}

impl Default for TargetingState {
    fn default() -> Self {
        Self::new()
    }
}

/// The smart targeting engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartTargeting {
    config: TargetingConfig,
    geometry: Geometry,
    normalizer: f64,
    state: TargetingState,
}

impl SmartTargeting {
    /// Create an engine over the given map.
    pub fn new(config: TargetingConfig, geometry: Geometry) -> Self {
        let normalizer = match config.distance_normalizer {
            Some(fixed) if fixed > 0.0 => fixed,
            _ => geometry.p90_distance(),
        };
        Self {
            config,
            geometry,
            normalizer,
            state: TargetingState::new(),
        }
    }

    /// The active configuration.
    pub const fn config(&self) -> &TargetingConfig {
        &self.config
    }

    /// The distance used to normalise leg lengths.
    pub const fn normalizer(&self) -> f64 {
        self.normalizer
    }

    /// Current service and reservation counters.
    pub const fn state(&self) -> &TargetingState {
        &self.state
    }

    /// Replace the counters, e.g. when restoring a snapshot.
    pub fn restore_state(&mut self, state: TargetingState) {
        self.state = state;
    }

    /// Benefit signals for one spoke's stock.
    pub fn benefit(spoke: SpokeIdx, stock: &ResourceVec, stage: Stage) -> SpokeBenefit {
        let shortfall = |resource| (1.0 - stock.get(resource)).max(0.0);
        let (d_a, d_b, d_c, d_d) = (
            shortfall(Resource::A),
            shortfall(Resource::B),
            shortfall(Resource::C),
            shortfall(Resource::D),
        );
        let total = d_a + d_b + d_c + d_d;

        let mut need = (total / 4.0).min(1.0);
        let mut ops_gain = match stage {
            Stage::A => d_a.min(1.0),
            Stage::B => d_b.min(1.0),
            Stage::Ops => ((d_c + d_d) / 2.0).min(1.0),
        };

        if total <= 0.0 {
            let off_level: f64 = stock
                .iter()
                .map(|(r, v)| (v - MAINTENANCE_LEVEL.get(r)).abs())
                .sum();
            let maintenance = (1.0 - off_level / 8.0).max(0.0);
            let readiness = stock.min_component().min(1.0);
            #[allow(clippy::cast_precision_loss)]
            let spread = 0.02f64.mul_add(-(spoke.index() as f64), 0.1).max(0.0);
            need = (maintenance + readiness + spread) / 3.0;
            ops_gain = ops_gain.max(need * 0.5).max(FALLBACK_FLOOR);
            need = need.max(FALLBACK_FLOOR);
        }

        SpokeBenefit {
            need,
            ops_gain,
            marginal: (need + ops_gain) / 2.0,
        }
    }

    /// Benefit signals for every spoke.
    pub fn benefits(network: &SpokeNetwork, stage: Stage) -> Vec<SpokeBenefit> {
        SpokeIdx::all()
            .map(|idx| Self::benefit(idx, &network.stock(idx), stage))
            .collect()
    }

    /// Cost of flying from `origin` to `spoke`.
    pub fn cost(&self, origin: Location, spoke: SpokeIdx, stock: &ResourceVec) -> SpokeCost {
        let distance = self.geometry.distance(origin, spoke) / self.normalizer;

        let reserved = self.state.reservations(spoke);
        let congestion = if reserved == 0 {
            0.0
        } else {
            match self.config.max_aircraft_per_spoke {
                Some(cap) if reserved >= cap => HARD_CONGESTION,
                Some(_) => SOFT_CONGESTION * f64::from(reserved),
                None => SOFT_CONGESTION,
            }
        };

        let recent = self.state.recent_service(spoke);
        let base_fairness = f64::from(recent) * (1.0 - self.config.fairness_decay);
        let fairness = if stock.total() >= PLENTIFUL_STOCK {
            let visited = if recent > 0 { 0.2 } else { 0.0 };
            base_fairness.mul_add(3.0, visited)
        } else {
            base_fairness
        };

        SpokeCost {
            distance,
            congestion,
            fairness,
        }
    }

    /// Score one leg. Draws exactly one jitter sample from `rng`.
    pub fn score<R: Rng>(
        &self,
        spoke: SpokeIdx,
        benefit: SpokeBenefit,
        cost: SpokeCost,
        stage: Stage,
        second_leg: bool,
        rng: &mut R,
    ) -> LegScore {
        let mut w_ops = self.config.w_ops;
        let mut w_need = self.config.w_need;
        match stage {
            Stage::A | Stage::B => w_need *= STAGE_EMPHASIS,
            Stage::Ops => w_ops *= STAGE_EMPHASIS,
        }
        if second_leg {
            w_ops *= self.config.second_leg_multiplier;
            w_need *= self.config.second_leg_multiplier;
        }

        let breakdown_base = ScoreBreakdown {
            ops: w_ops * benefit.ops_gain,
            need: w_need * benefit.need,
            distance: -self.config.w_dist * cost.distance,
            congestion: -self.config.w_cong * cost.congestion,
            fairness: -self.config.w_cong * cost.fairness,
            jitter: 1.0,
        };
        let base = breakdown_base.ops
            + breakdown_base.need
            + breakdown_base.distance
            + breakdown_base.congestion
            + breakdown_base.fairness;

        let spread = self.config.jitter_percent.abs();
        let jitter = rng.random_range((1.0 - spread)..=(1.0 + spread));

        LegScore {
            spoke,
            score: base * jitter,
            benefit,
            cost,
            breakdown: ScoreBreakdown {
                jitter,
                ..breakdown_base
            },
        }
    }

    /// Score every spoke from `origin`, best first. Ties keep index order.
    pub fn rank_legs<R: Rng>(
        &self,
        origin: Location,
        network: &SpokeNetwork,
        stage: Stage,
        exclude: Option<SpokeIdx>,
        second_leg: bool,
        rng: &mut R,
    ) -> Vec<LegScore> {
        let benefits = Self::benefits(network, stage);
        let mut legs: Vec<LegScore> = SpokeIdx::all()
            .zip(benefits)
            .filter(|(idx, _)| Some(*idx) != exclude)
            .map(|(idx, benefit)| {
                let cost = self.cost(origin, idx, &network.stock(idx));
                self.score(idx, benefit, cost, stage, second_leg, rng)
            })
            .collect();
        legs.sort_by(|a, b| b.score.total_cmp(&a.score));
        legs
    }

    /// Best single leg from `origin`, if any spoke is eligible.
    pub fn best_leg<R: Rng>(
        &self,
        origin: Location,
        network: &SpokeNetwork,
        stage: Stage,
        exclude: Option<SpokeIdx>,
        rng: &mut R,
    ) -> Option<LegScore> {
        self.rank_legs(origin, network, stage, exclude, exclude.is_some(), rng)
            .into_iter()
            .next()
    }

    /// Best onward leg from `first`, kept only if its discounted score
    /// clears `second_leg_threshold`.
    pub fn second_leg<R: Rng>(
        &self,
        network: &SpokeNetwork,
        stage: Stage,
        first: SpokeIdx,
        rng: &mut R,
    ) -> Option<LegScore> {
        self.best_leg(Location::Spoke(first), network, stage, Some(first), rng)
            .filter(|leg| leg.score > self.config.second_leg_threshold)
    }

    /// Choose a route and cargo for an aircraft at the hub.
    ///
    /// Candidates are tried best first; the first one that yields cargo
    /// under an unclaimed pairing key wins. Chosen spokes are reserved for
    /// the rest of the period and their service counters bumped.
    pub fn plan_route<R: Rng>(
        &mut self,
        network: &SpokeNetwork,
        capacity: u32,
        stage: Stage,
        claims: &mut PeriodClaims,
        rng: &mut R,
    ) -> Option<Allocation> {
        let candidates = self.rank_legs(Location::Hub, network, stage, None, false, rng);
        for first in candidates {
            let second = self
                .second_leg(network, stage, first.spoke, rng)
                .map(|leg| leg.spoke);

            let mut plan = plan_allocation(network, first.spoke, second, capacity, stage);
            if plan.is_empty() {
                continue;
            }
            if claims.is_claimed(&plan.route.pairing_key()) {
                // The pair is taken; fall back to the first leg alone.
                plan = plan_allocation(network, first.spoke, None, capacity, stage);
                if plan.is_empty() || claims.is_claimed(&plan.route.pairing_key()) {
                    continue;
                }
            }
            claims.claim(plan.route.pairing_key());
            self.reserve(plan.route.first());
            if let Some(second) = plan.route.second() {
                self.reserve(second);
            }
            debug!(
                route = %plan.route,
                score = first.score,
                stage = %stage,
                "Smart targeting selected route"
            );
            return Some(plan);
        }
        None
    }

    /// Reserve a spoke for this period and count the visit.
    pub fn reserve(&mut self, spoke: SpokeIdx) {
        if let Some(count) = self.state.reservations.get_mut(spoke.index()) {
            *count = count.saturating_add(1);
        }
        if let Some(count) = self.state.recent_service.get_mut(spoke.index()) {
            *count = count.saturating_add(1);
        }
    }

    /// Period-end bookkeeping: decay service counters and clear reservations.
    pub fn end_period(&mut self) {
        let decay = self.config.fairness_decay;
        for count in &mut self.state.recent_service {
            let decayed = (f64::from(*count) * decay).floor().max(0.0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let decayed = decayed as u32;
            *count = decayed;
        }
        for count in &mut self.state.reservations {
            *count = 0;
        }
    }

    /// Score every spoke from `origin` for a hypothetical aircraft.
    pub fn debug_route_planning<R: Rng>(
        &self,
        origin: Location,
        network: &SpokeNetwork,
        stage: Stage,
        capacity: u32,
        rng: &mut R,
    ) -> RouteDebug {
        let second_leg = matches!(origin, Location::Spoke(_));
        let spokes = self
            .rank_legs(origin, network, stage, None, second_leg, rng)
            .into_iter()
            .map(|leg| SpokeDebug {
                spoke: leg.spoke,
                stock: network.stock(leg.spoke),
                leg,
            })
            .collect();
        RouteDebug {
            stage,
            origin,
            capacity,
            spokes,
        }
    }
}
