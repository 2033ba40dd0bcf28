//! Per-period checkpoints for rewind and replay.
//!
//! A [`Snapshot`] is taken at period 0 and after every committed period.
//! It copies the mutable simulation state but not the action log: each
//! snapshot carries only the actions of the period that produced it, and
//! the engine rebuilds the log prefix from the append-only log itself.

use std::collections::VecDeque;

use cargosim_audit::InvariantChecker;
use cargosim_fleet::Aircraft;
use cargosim_types::PeriodLog;
use cargosim_world::SpokeNetwork;
use serde::Serialize;

use crate::clock::SimClock;
use crate::targeting::TargetingState;

/// Errors that can occur when navigating history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// No snapshot is stored for the requested period.
    #[error("no snapshot stored for period {period}")]
    NoSnapshot {
        /// The requested period.
        period: u64,
    },

    /// Stepping back needs at least two stored snapshots.
    #[error("nothing to step back to")]
    NothingToStepBack,
}

/// Full simulation state at the start of a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Clock at the time of the snapshot.
    pub clock: SimClock,
    /// Spoke stock, pending arrivals, flags, and op counters.
    pub network: SpokeNetwork,
    /// Every aircraft in fleet order.
    pub fleet: Vec<Aircraft>,
    /// Round-robin cursor into the pair order.
    pub pair_cursor: usize,
    /// Network-wide ops total sampled after each period.
    pub ops_total_history: Vec<u64>,
    /// Smart targeting counters.
    pub targeting: TargetingState,
    /// Consecutive periods without progress.
    pub stuck_periods: u32,
    /// Audit findings up to this period.
    pub audit: InvariantChecker,
    /// Actions committed by the period that produced this snapshot.
    /// Empty for the initial snapshot.
    pub period_actions: PeriodLog,
}

impl Snapshot {
    /// The period this snapshot resumes from.
    pub const fn period(&self) -> u64 {
        self.clock.period()
    }
}

/// Ordered snapshot store with optional oldest-first eviction.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    snapshots: VecDeque<Snapshot>,
    max_snapshots: Option<usize>,
}

impl SnapshotHistory {
    /// Create an empty store. `max_snapshots` of `None` keeps everything.
    pub fn new(max_snapshots: Option<usize>) -> Self {
        Self {
            snapshots: VecDeque::new(),
            max_snapshots: max_snapshots.map(|n| n.max(1)),
        }
    }

    /// Append a snapshot, evicting the oldest entries beyond the bound.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push_back(snapshot);
        if let Some(max) = self.max_snapshots {
            while self.snapshots.len() > max {
                self.snapshots.pop_front();
            }
        }
    }

    /// The most recent snapshot.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    /// The snapshot that resumes from `period`, if still stored.
    pub fn get(&self, period: u64) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.period() == period)
    }

    /// Remove and return the most recent snapshot.
    pub fn pop_latest(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    /// Drop every snapshot later than `period`.
    pub fn truncate_after(&mut self, period: u64) {
        while self.snapshots.back().is_some_and(|s| s.period() > period) {
            self.snapshots.pop_back();
        }
    }

    /// Periods that can be restored, oldest first.
    pub fn periods(&self) -> impl Iterator<Item = u64> + '_ {
        self.snapshots.iter().map(Snapshot::period)
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cargosim_types::ResourceVec;

    use super::*;

    fn snapshot(period: u64) -> Snapshot {
        Snapshot {
            clock: SimClock::at(period),
            network: SpokeNetwork::new(ResourceVec::ZERO),
            fleet: Vec::new(),
            pair_cursor: 0,
            ops_total_history: Vec::new(),
            targeting: TargetingState::default(),
            stuck_periods: 0,
            audit: InvariantChecker::new(),
            period_actions: Vec::new(),
        }
    }

    #[test]
    fn bounded_history_evicts_oldest() {
        let mut history = SnapshotHistory::new(Some(3));
        for p in 0..5 {
            history.push(snapshot(p));
        }
        assert_eq!(history.periods().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(history.get(1).is_none());
        assert_eq!(history.latest().unwrap().period(), 4);
    }

    #[test]
    fn truncate_after_keeps_prefix() {
        let mut history = SnapshotHistory::new(None);
        for p in 0..5 {
            history.push(snapshot(p));
        }
        history.truncate_after(2);
        assert_eq!(history.len(), 3);
        assert_eq!(history.pop_latest().unwrap().period(), 2);
        history.truncate_after(0);
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
    }
}
