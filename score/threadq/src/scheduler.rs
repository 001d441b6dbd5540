//! Scheduler interface
//!
//! The synchronization core never switches threads itself. It reports
//! blocking, readiness and priority changes to the host scheduler through
//! this trait. All callbacks run inside the interrupt gate and must not call
//! back into the kernel.

use score_core::{Priority, ThreadId};

pub trait Scheduler {
    /// `thread` left the ready set to wait on a resource.
    fn thread_blocked(&self, thread: ThreadId);

    /// `thread` finished its wait and is ready to run at `priority`.
    fn thread_ready(&self, thread: ThreadId, priority: Priority);

    /// The effective priority of `thread` changed.
    fn priority_changed(&self, thread: ThreadId, priority: Priority);
}

/// Scheduler that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScheduler;

impl Scheduler for NullScheduler {
    fn thread_blocked(&self, _thread: ThreadId) {}

    fn thread_ready(&self, _thread: ThreadId, _priority: Priority) {}

    fn priority_changed(&self, _thread: ThreadId, _priority: Priority) {}
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
    fn thread_blocked(&self, thread: ThreadId) {
        (**self).thread_blocked(thread)
    }

    fn thread_ready(&self, thread: ThreadId, priority: Priority) {
        (**self).thread_ready(thread, priority)
    }

    fn priority_changed(&self, thread: ThreadId, priority: Priority) {
        (**self).priority_changed(thread, priority)
    }
}
