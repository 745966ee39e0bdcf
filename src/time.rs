/*! Time and rate quantities

The analysis works over a continuous time model: periods, deadlines,
and costs are non-negative real numbers expressed in whatever time
unit the input configuration uses. Access rates are counts per time
unit. Both are wrapped in newtypes so that a rate is never silently
confused with a duration. */

use std::ops::Mul;

use derive_more::{Add, AddAssign, Display, From, Into, Sub, Sum};

/// A non-negative length of time (a period, deadline, execution
/// cost, or blocking bound).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, PartialOrd, Add, AddAssign, Sub, Sum, From, Into, Display,
)]
pub struct Duration(f64);

impl Duration {
    pub const fn zero() -> Self {
        Duration(0.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Is this a finite, strictly positive length?
    pub fn is_positive(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Is this a finite length no smaller than zero?
    pub fn is_non_negative(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    /// Clamp negative values to zero, i.e., `[self]_0`.
    pub fn positive_part(self) -> Self {
        Duration(self.0.max(0.0))
    }

    /// The maximum number of releases of a periodic process with
    /// period `self` that can overlap an interval of length `window`,
    /// i.e., `ceil(window / self)`.
    pub fn releases_within(self, window: Duration) -> u64 {
        (window.0 / self.0).ceil() as u64
    }
}

impl Mul<u64> for Duration {
    type Output = Duration;

    fn mul(self, n: u64) -> Duration {
        Duration(self.0 * n as f64)
    }
}

/// A rate of events (resource accesses or job releases) per time unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, PartialOrd, Add, AddAssign, Sub, Sum, From, Into, Display,
)]
pub struct Rate(f64);

impl Rate {
    pub const fn zero() -> Self {
        Rate(0.0)
    }

    /// The rate of `count` events per `period`.
    pub fn of(count: u32, period: Duration) -> Self {
        Rate(f64::from(count) / period.value())
    }

    /// The rate of one event per `period`.
    pub fn once_per(period: Duration) -> Self {
        Rate::of(1, period)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn min(self, other: Rate) -> Rate {
        Rate(self.0.min(other.0))
    }

    /// Clamp negative values to zero, i.e., `[self]_0`.
    pub fn positive_part(self) -> Rate {
        Rate(self.0.max(0.0))
    }
}

/// Weighting a rate by a per-event cost yields a time bound.
impl Mul<Duration> for Rate {
    type Output = Duration;

    fn mul(self, cost: Duration) -> Duration {
        Duration(self.0 * cost.value())
    }
}
