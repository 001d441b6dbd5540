//! Error type shared by the synchronization layers

use thiserror::Error;

/// Result type used throughout SuperCore
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors reported synchronously by the synchronization core.
///
/// The core never retries and never swallows one of these; the caller
/// decides how to recover.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// Release attempted by a thread that does not own the mutex
    #[error("mutex is not owned by the calling thread")]
    NotOwner,
    /// Recursive acquire on a mutex that forbids nesting
    #[error("recursive acquire would deadlock")]
    SelfDeadlock,
    /// A bounded acquire reached its deadline
    #[error("wait timed out")]
    TimedOut,
    /// Destroy or flush-for-removal of a mutex held by a live owner
    #[error("mutex is held by a live owner")]
    BusyOnDestroy,
    /// A non-blocking acquire found the mutex held
    #[error("mutex is unavailable")]
    Unavailable,
    /// Caller priority is above the ceiling of a ceiling-protocol mutex
    #[error("caller priority exceeds the mutex ceiling")]
    CeilingViolated,
    /// The waiter was released because the mutex was destroyed
    #[error("mutex was deleted while waiting")]
    Deleted,
    /// The waiter was released by a flush of the wait queue
    #[error("wait queue was flushed while waiting")]
    Reset,
    /// Protocol and queue discipline do not fit together
    #[error("invalid mutex attributes")]
    InvalidAttributes,
    /// Handle does not name a live thread
    #[error("invalid thread handle")]
    InvalidThread,
    /// Handle does not name a live mutex
    #[error("invalid mutex handle")]
    InvalidMutex,
    /// Thread table is full
    #[error("thread table is full")]
    TooManyThreads,
    /// Mutex table is full
    #[error("mutex table is full")]
    TooManyMutexes,
    /// Operation not allowed in the thread's current state
    #[error("thread is in the wrong state for this operation")]
    InvalidState,
    /// The thread is still waiting; its wait has no outcome yet
    #[error("thread is still waiting")]
    Pending,
}
