//! Tick counters for watchdog timers

use core::fmt;
use core::time::Duration;

/// Watchdog tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks(pub u32);

impl Ticks {
    /// Zero ticks
    pub const ZERO: Self = Self(0);

    /// Maximum tick count
    pub const MAX: Self = Self(u32::MAX);

    /// Create a tick counter
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Get the raw tick count
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Check if the counter is zero
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Decrement the counter by one tick
    ///
    /// Returns true if this tick brought the counter to zero.
    pub fn decrement(&mut self) -> bool {
        if self.0 > 0 {
            self.0 -= 1;
            self.0 == 0
        } else {
            false
        }
    }

    /// Convert a duration into ticks of `period`, rounding up.
    ///
    /// A non-zero duration always yields at least one tick so that a bounded
    /// wait can never expire before it is armed. Durations beyond the counter
    /// range saturate at [`Ticks::MAX`].
    pub fn from_duration(duration: Duration, period: Duration) -> Self {
        if duration.is_zero() {
            return Self::ZERO;
        }
        let period_ns = period.as_nanos().max(1);
        let ticks = duration.as_nanos().div_ceil(period_ns);
        Self(u32::try_from(ticks).unwrap_or(u32::MAX))
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ticks", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_reports_expiry_once() {
        let mut ticks = Ticks::new(2);
        assert!(!ticks.decrement());
        assert!(ticks.decrement());
        assert!(!ticks.decrement());
        assert!(ticks.is_zero());
    }

    #[test]
    fn duration_rounds_up() {
        let period = Duration::from_millis(10);
        assert_eq!(Ticks::from_duration(Duration::from_millis(100), period), Ticks(10));
        assert_eq!(Ticks::from_duration(Duration::from_millis(101), period), Ticks(11));
        assert_eq!(Ticks::from_duration(Duration::from_micros(1), period), Ticks(1));
        assert_eq!(Ticks::from_duration(Duration::ZERO, period), Ticks::ZERO);
    }

    #[test]
    fn huge_duration_saturates() {
        let period = Duration::from_nanos(1);
        assert_eq!(Ticks::from_duration(Duration::from_secs(3600), period), Ticks::MAX);
    }
}
