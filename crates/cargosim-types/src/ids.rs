//! Bounded spoke identifiers and hub/spoke locations.
//!
//! The network has a fixed number of spokes. [`SpokeIdx`] can only hold a
//! value inside `0..SPOKE_COUNT`, so lookups keyed by it never need a
//! range check after construction. Indices are 0-based internally and
//! rendered 1-based (`S1`..`S10`) everywhere a human reads them.

use serde::{Deserialize, Serialize};

/// Number of spokes served by the hub.
pub const SPOKE_COUNT: usize = 10;

/// Error returned when converting an out-of-range integer to a [`SpokeIdx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("spoke index {index} is outside 0..{SPOKE_COUNT}")]
pub struct SpokeIndexError {
    /// The rejected index.
    pub index: usize,
}

/// 0-based index of a spoke, guaranteed to be below [`SPOKE_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpokeIdx(u8);

impl SpokeIdx {
    /// Create a spoke index, returning `None` when out of range.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(index: usize) -> Option<Self> {
        if index < SPOKE_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// The 0-based index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The 1-based number shown to users (`S1`..`S10`).
    pub const fn number(self) -> usize {
        self.index().saturating_add(1)
    }

    /// Iterate every spoke in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SPOKE_COUNT).filter_map(Self::new)
    }
}

impl TryFrom<u8> for SpokeIdx {
    type Error = SpokeIndexError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(value)).ok_or(SpokeIndexError {
            index: usize::from(value),
        })
    }
}

impl TryFrom<usize> for SpokeIdx {
    type Error = SpokeIndexError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(SpokeIndexError { index: value })
    }
}

impl From<SpokeIdx> for u8 {
    fn from(idx: SpokeIdx) -> Self {
        idx.0
    }
}

impl core::fmt::Display for SpokeIdx {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "S{}", self.number())
    }
}

/// Where an aircraft currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// The central depot.
    Hub,
    /// One of the outlying spokes.
    Spoke(SpokeIdx),
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Hub => f.write_str("HUB"),
            Self::Spoke(idx) => write!(f, "{idx}"),
        }
    }
}
