//! Mutex creation attributes

use score_core::{Priority, SyncError, SyncResult};
use score_threadq::Discipline;

/// Locking protocol of a mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    /// No priority adjustment.
    Plain,
    /// The owner runs at least at the priority of its highest waiter.
    Inherit,
    /// The owner runs at least at the given ceiling while it holds the mutex.
    Ceiling(Priority),
}

/// What happens when the owner acquires the mutex again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Recursion {
    /// Nest: each acquire needs a matching release.
    Allowed,
    /// Fail with [`SyncError::SelfDeadlock`].
    Forbidden,
}

/// Attributes fixed when a mutex is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MutexAttributes {
    pub discipline: Discipline,
    pub protocol: Protocol,
    pub recursion: Recursion,
}

impl Default for MutexAttributes {
    fn default() -> Self {
        Self::new(Discipline::Fifo, Protocol::Plain, Recursion::Allowed)
    }
}

impl MutexAttributes {
    pub const fn new(discipline: Discipline, protocol: Protocol, recursion: Recursion) -> Self {
        Self {
            discipline,
            protocol,
            recursion,
        }
    }

    /// Priority-ordered mutex with priority inheritance.
    pub const fn inherit() -> Self {
        Self::new(Discipline::Priority, Protocol::Inherit, Recursion::Allowed)
    }

    /// Priority-ordered mutex with the given priority ceiling.
    pub const fn ceiling(ceiling: Priority) -> Self {
        Self::new(
            Discipline::Priority,
            Protocol::Ceiling(ceiling),
            Recursion::Allowed,
        )
    }

    pub const fn with_discipline(mut self, discipline: Discipline) -> Self {
        self.discipline = discipline;
        self
    }

    pub const fn with_recursion(mut self, recursion: Recursion) -> Self {
        self.recursion = recursion;
        self
    }

    /// Check that the protocol can be honoured with the chosen discipline.
    ///
    /// Both priority protocols rely on waiters being served by priority.
    pub fn validate(&self) -> SyncResult<()> {
        match (self.protocol, self.discipline) {
            (Protocol::Plain, _) => Ok(()),
            (_, Discipline::Priority) => Ok(()),
            (_, Discipline::Fifo) => Err(SyncError::InvalidAttributes),
        }
    }
}
