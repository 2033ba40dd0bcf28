//! Baseline round-robin pairing scheduler.
//!
//! Each idle aircraft scans the configured pair order starting at a shared
//! cursor and takes the first pair that yields cargo and whose pairing key
//! is still free this period. Only an accepted pair moves the shared
//! cursor (to the entry after it), so the rotation keeps progressing across
//! periods even when some pairs have nothing to carry.

use std::collections::BTreeSet;

use cargosim_types::{PairingKey, SpokeIdx, Stage};
use cargosim_world::SpokeNetwork;

use crate::planner::{Allocation, plan_allocation};

/// Pairing keys already taken during the current period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodClaims {
    claimed: BTreeSet<PairingKey>,
}

impl PeriodClaims {
    /// An empty claim set.
    pub const fn new() -> Self {
        Self {
            claimed: BTreeSet::new(),
        }
    }

    /// Whether the key has been taken this period.
    pub fn is_claimed(&self, key: &PairingKey) -> bool {
        self.claimed.contains(key)
    }

    /// Take a key. Returns `false` if it was already taken.
    pub fn claim(&mut self, key: PairingKey) -> bool {
        self.claimed.insert(key)
    }

    /// Number of keys taken.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Whether no key has been taken.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Round-robin assignment over a fixed pair order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingScheduler {
    order: Vec<(SpokeIdx, SpokeIdx)>,
    cursor: usize,
}

impl PairingScheduler {
    /// Create a scheduler with the cursor at the first pair.
    pub const fn new(order: Vec<(SpokeIdx, SpokeIdx)>) -> Self {
        Self { order, cursor: 0 }
    }

    /// The pair order.
    pub fn order(&self) -> &[(SpokeIdx, SpokeIdx)] {
        &self.order
    }

    /// Index of the pair the next scan starts from.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reposition the cursor, wrapping into range.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.checked_rem(self.order.len()).unwrap_or(0);
    }

    /// Find a route for an aircraft of the given capacity.
    ///
    /// On success the pairing key is claimed and the cursor advances past
    /// the accepted pair. Returns `None` when no pair in a full rotation
    /// yields cargo under an unclaimed key.
    pub fn assign(
        &mut self,
        network: &SpokeNetwork,
        capacity: u32,
        stage: Stage,
        claims: &mut PeriodClaims,
    ) -> Option<Allocation> {
        let len = self.order.len();
        let mut position = self.cursor;
        for _ in 0..len {
            if let Some(&(i, j)) = self.order.get(position) {
                let plan = plan_allocation(network, i, Some(j), capacity, stage);
                let key = plan.route.pairing_key();
                if !plan.is_empty() && claims.claim(key) {
                    self.cursor = position.saturating_add(1).checked_rem(len).unwrap_or(0);
                    return Some(plan);
                }
            }
            position = position.saturating_add(1).checked_rem(len).unwrap_or(0);
        }
        None
    }
}
