//! Thread priorities

use core::fmt;

/// Scheduling priority of a thread.
///
/// Larger values are more urgent: a thread at priority 90 preempts a thread
/// at priority 10. The full `u8` range is usable; `IDLE` is conventionally
/// reserved for the idle thread by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Priority(u8);

impl Priority {
    /// Lowest priority level
    pub const IDLE: Priority = Priority(0);

    /// Highest priority level
    pub const MAX: Priority = Priority(u8::MAX);

    /// Create a priority level
    pub const fn new(level: u8) -> Self {
        Priority(level)
    }

    /// Get the raw priority value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns true if `self` would preempt `other`.
    pub const fn is_above(self, other: Priority) -> bool {
        self.0 > other.0
    }
}

impl From<u8> for Priority {
    fn from(level: u8) -> Self {
        Priority(level)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Priority({})", self.0)
    }
}

/// Macro to create compile-time priority constants
#[macro_export]
macro_rules! priority {
    ($value:literal) => {
        $crate::Priority::new($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_value_is_more_urgent() {
        let low = Priority::new(10);
        let high = Priority::new(90);
        assert!(high > low);
        assert!(high.is_above(low));
        assert!(!low.is_above(high));
        assert!(!low.is_above(low));
    }

    #[test]
    fn macro_builds_constant() {
        const CEILING: Priority = priority!(42);
        assert_eq!(CEILING.raw(), 42);
        assert_eq!(Priority::from(42), CEILING);
    }
}
