//! Sortie routes and pairing keys.

use serde::{Deserialize, Serialize};

use crate::ids::SpokeIdx;

/// A planned sortie: one spoke, or two spokes visited in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Hub, one spoke, hub.
    Single(SpokeIdx),
    /// Hub, first spoke, second spoke, hub.
    Pair(SpokeIdx, SpokeIdx),
}

impl Route {
    /// Build a route from a first spoke and an optional second spoke.
    pub const fn from_legs(first: SpokeIdx, second: Option<SpokeIdx>) -> Self {
        match second {
            Some(second) => Self::Pair(first, second),
            None => Self::Single(first),
        }
    }

    /// The first spoke visited.
    pub const fn first(self) -> SpokeIdx {
        match self {
            Self::Single(first) | Self::Pair(first, _) => first,
        }
    }

    /// The second spoke visited, if any.
    pub const fn second(self) -> Option<SpokeIdx> {
        match self {
            Self::Single(_) => None,
            Self::Pair(_, second) => Some(second),
        }
    }

    /// The key used to keep two aircraft off the same route in one period.
    pub const fn pairing_key(self) -> PairingKey {
        PairingKey {
            first: self.first(),
            second: self.second(),
        }
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Single(first) => write!(f, "{first}"),
            Self::Pair(first, second) => write!(f, "{first}+{second}"),
        }
    }
}

/// Per-period uniqueness key `(i, j-or-none)`.
///
/// A single-leg sortie to `i` and a paired sortie `i, j` have different
/// keys, so both may fly in the same period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairingKey {
    /// First spoke of the route.
    pub first: SpokeIdx,
    /// Second spoke, or `None` for a single-leg route.
    pub second: Option<SpokeIdx>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn single_and_pair_keys_differ() {
        let s0 = SpokeIdx::new(0).unwrap();
        let s1 = SpokeIdx::new(1).unwrap();
        assert_ne!(
            Route::Single(s0).pairing_key(),
            Route::Pair(s0, s1).pairing_key()
        );
        assert_eq!(Route::from_legs(s0, None), Route::Single(s0));
        assert_eq!(Route::Pair(s0, s1).second(), Some(s1));
    }
}
