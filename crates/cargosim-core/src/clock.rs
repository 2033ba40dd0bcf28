//! Period clock for the `CargoSim` engine.
//!
//! The period counter is the single source of truth for simulated time.
//! Day and half-day are derived from it and never stored independently:
//! `day = period / 2`, even periods are AM, odd periods are PM.

use cargosim_types::Half;
use serde::{Deserialize, Serialize};

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Period counter would overflow.
    #[error("period counter overflow: cannot advance beyond u64::MAX")]
    PeriodOverflow,
}

/// Simulated time, counted in half-day periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimClock {
    period: u64,
}

impl SimClock {
    /// A clock at period 0 (day 0, AM).
    pub const fn new() -> Self {
        Self { period: 0 }
    }

    /// A clock positioned at an arbitrary period.
    pub const fn at(period: u64) -> Self {
        Self { period }
    }

    /// Periods elapsed since the start of the run.
    pub const fn period(&self) -> u64 {
        self.period
    }

    /// Whole days elapsed.
    pub const fn day(&self) -> u64 {
        self.period / 2
    }

    /// Half of the current day.
    pub const fn half(&self) -> Half {
        Half::of_period(self.period)
    }

    /// Advance by one period and return the new period number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PeriodOverflow`] if the counter would overflow.
    pub const fn advance(&mut self) -> Result<u64, ClockError> {
        match self.period.checked_add(1) {
            Some(next) => {
                self.period = next;
                Ok(next)
            }
            None => Err(ClockError::PeriodOverflow),
        }
    }
}

impl core::fmt::Display for SimClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "period {} (day {} {})", self.period, self.day(), self.half())
    }
}
