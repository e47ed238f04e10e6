//! Game-time units for effect expiry.
//!
//! The engine never reads wall-clock time. An external clock supplies a
//! monotonically advancing tick counter (one tick per millisecond in the
//! reference scheduler) and all expiry math is modular `u64` arithmetic so
//! counter wraparound does not corrupt comparisons.

use std::fmt;

/// Half the counter range. Two ticks are comparable as long as they are
/// within this horizon of each other.
const WRAP_HORIZON: u64 = u64::MAX / 2;

/// Discrete time unit in the external scheduling system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Elapsed ticks since `earlier`, as modular unsigned arithmetic.
    ///
    /// If `earlier` is actually in the future the result wraps to a large
    /// value; callers that care must check [`Tick::is_after`] first.
    pub fn duration_since(self, earlier: Tick) -> u64 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Wraparound-tolerant "is `self` strictly later than `other`".
    ///
    /// Valid whenever the two ticks are within half the counter range of
    /// each other, which the external clock contract guarantees for any
    /// pair of live timestamps.
    pub fn is_after(self, other: Tick) -> bool {
        let delta = self.0.wrapping_sub(other.0);
        delta != 0 && delta < WRAP_HORIZON
    }

    /// The tick `ticks` after `self`, wrapping at the counter boundary.
    pub fn advanced_by(self, ticks: u64) -> Tick {
        Tick(self.0.wrapping_add(ticks))
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        self.advanced_by(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
