//! Four-component resource vectors and the operational gate.
//!
//! A [`ResourceVec`] holds one amount per [`Resource`] in `A, B, C, D`
//! order. It is used for resident spoke stock, queued arrivals, and
//! aircraft payloads alike. Amounts are `f64` so that fractional stock
//! configured by operators survives unchanged; all planner arithmetic
//! works in whole units.

use serde::{Deserialize, Serialize};

use crate::enums::Resource;

/// Tolerance below which an amount is treated as absent.
pub const EPSILON: f64 = 1e-9;

/// Amount of each resource, indexed by [`Resource`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVec([f64; 4]);

impl ResourceVec {
    /// All four amounts zero.
    pub const ZERO: Self = Self([0.0; 4]);

    /// Build a vector from explicit `A, B, C, D` amounts.
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self([a, b, c, d])
    }

    /// Build a vector from an `[A, B, C, D]` array.
    pub const fn from_array(values: [f64; 4]) -> Self {
        Self(values)
    }

    /// The amounts as an `[A, B, C, D]` array.
    pub const fn to_array(self) -> [f64; 4] {
        self.0
    }

    /// Amount of a single resource.
    pub const fn get(&self, resource: Resource) -> f64 {
        let [a, b, c, d] = self.0;
        match resource {
            Resource::A => a,
            Resource::B => b,
            Resource::C => c,
            Resource::D => d,
        }
    }

    /// Mutable access to a single resource amount.
    pub const fn get_mut(&mut self, resource: Resource) -> &mut f64 {
        let [a, b, c, d] = &mut self.0;
        match resource {
            Resource::A => a,
            Resource::B => b,
            Resource::C => c,
            Resource::D => d,
        }
    }

    /// Overwrite a single resource amount.
    pub const fn set(&mut self, resource: Resource, value: f64) {
        *self.get_mut(resource) = value;
    }

    /// Add `amount` to a single resource.
    pub fn add_amount(&mut self, resource: Resource, amount: f64) {
        *self.get_mut(resource) += amount;
    }

    /// Decrement a resource by one unit, clamping at zero.
    pub fn draw_one(&mut self, resource: Resource) {
        let slot = self.get_mut(resource);
        *slot = (*slot - 1.0).max(0.0);
    }

    /// Sum of all four amounts.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Smallest of the four amounts.
    pub fn min_component(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Whether the vector carries no meaningful cargo.
    pub fn is_empty(&self) -> bool {
        self.total() <= EPSILON
    }

    /// Whether both baseline resources (A and B) are strictly positive.
    ///
    /// Consumption only draws down spokes for which this holds.
    pub fn has_baseline(&self) -> bool {
        self.get(Resource::A) > 0.0 && self.get(Resource::B) > 0.0
    }

    /// Iterate `(resource, amount)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, f64)> + '_ {
        Resource::ALL.into_iter().map(|r| (r, self.get(r)))
    }
}

impl From<[f64; 4]> for ResourceVec {
    fn from(values: [f64; 4]) -> Self {
        Self(values)
    }
}

impl core::ops::AddAssign for ResourceVec {
    fn add_assign(&mut self, rhs: Self) {
        for resource in Resource::ALL {
            self.add_amount(resource, rhs.get(resource));
        }
    }
}

impl core::ops::Add for ResourceVec {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl core::fmt::Display for ResourceVec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[A={a} B={b} C={c} D={d}]")
    }
}

/// The operational gate: every resource strictly above [`EPSILON`].
///
/// Only resident stock may be passed here. Cargo that is still airborne
/// or queued for next-period arrival must never count toward the gate.
pub fn is_ops_capable(stock: &ResourceVec) -> bool {
    Resource::ALL.iter().all(|&r| stock.get(r) > EPSILON)
}
