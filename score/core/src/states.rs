//! Thread states and wait outcomes

use core::fmt;

/// Scheduling state of a thread as seen by the synchronization core.
///
/// A blocked thread is either waiting without a bound or with an armed
/// watchdog; the two are one blocking episode, the second merely carrying a
/// timer. `Dormant` belongs to the scheduler and is opaque here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThreadState {
    /// Eligible to run
    Ready,
    /// Waiting on a resource without a deadline
    BlockedOnResource,
    /// Waiting on a resource with an armed watchdog
    BlockedWithTimeout,
    /// Suspended by the scheduler
    Dormant,
}

impl ThreadState {
    /// Returns true for both blocked states.
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::BlockedOnResource | Self::BlockedWithTimeout)
    }

    /// Returns true if the thread may be scheduled.
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::BlockedOnResource => write!(f, "blocked"),
            Self::BlockedWithTimeout => write!(f, "blocked (timed)"),
            Self::Dormant => write!(f, "dormant"),
        }
    }
}

/// Outcome of a completed blocking episode.
///
/// Recorded on the thread when it leaves a wait queue and read back by the
/// thread once it runs again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitStatus {
    /// The resource was handed over
    Granted,
    /// The watchdog fired before the resource was handed over
    TimedOut,
    /// The resource was destroyed while the thread waited
    Deleted,
    /// The wait queue was flushed without destroying the resource
    Reset,
}

impl WaitStatus {
    /// Returns true for the statuses a flush may deliver: the waiter was
    /// neither granted the resource nor timed out.
    pub const fn is_flush(self) -> bool {
        matches!(self, Self::Deleted | Self::Reset)
    }
}

impl fmt::Display for WaitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Deleted => write!(f, "deleted"),
            Self::Reset => write!(f, "reset"),
        }
    }
}
