//! Host scheduler
//!
//! Every kernel thread is backed by an OS thread. When the kernel reports a
//! thread blocked, its parker is lowered; when the thread is made ready the
//! parker is raised and the OS thread waiting on it is woken. The OS
//! scheduler still decides who runs; effective priorities are recorded so
//! callers can observe inheritance and ceiling boosts.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use score_core::{Priority, ThreadId};
use score_threadq::Scheduler;

struct Parker {
    ready: Mutex<bool>,
    wake: Condvar,
}

impl Parker {
    fn block(&self) {
        *self.ready.lock() = false;
    }

    fn unblock(&self) {
        *self.ready.lock() = true;
        self.wake.notify_one();
    }

    fn park(&self) {
        let mut ready = self.ready.lock();
        while !*ready {
            self.wake.wait(&mut ready);
        }
    }
}

struct Entry {
    parker: Arc<Parker>,
    priority: Priority,
}

#[derive(Default)]
pub struct HostScheduler {
    threads: Mutex<HashMap<ThreadId, Entry>>,
}

impl HostScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, thread: ThreadId, priority: Priority) {
        let entry = Entry {
            parker: Arc::new(Parker {
                ready: Mutex::new(true),
                wake: Condvar::new(),
            }),
            priority,
        };
        self.threads.lock().insert(thread, entry);
    }

    pub(crate) fn unregister(&self, thread: ThreadId) {
        self.threads.lock().remove(&thread);
    }

    /// Suspend the calling OS thread until `thread` is made ready.
    pub fn park(&self, thread: ThreadId) {
        let parker = self
            .threads
            .lock()
            .get(&thread)
            .map(|entry| Arc::clone(&entry.parker));
        match parker {
            Some(parker) => parker.park(),
            None => log::warn!("{thread} is not known to the host scheduler"),
        }
    }

    /// Last effective priority reported for `thread`.
    pub fn priority(&self, thread: ThreadId) -> Option<Priority> {
        self.threads.lock().get(&thread).map(|entry| entry.priority)
    }

    fn with_entry(&self, thread: ThreadId, f: impl FnOnce(&mut Entry)) {
        match self.threads.lock().get_mut(&thread) {
            Some(entry) => f(entry),
            None => log::warn!("notification for unknown {thread}"),
        }
    }
}

impl Scheduler for HostScheduler {
    fn thread_blocked(&self, thread: ThreadId) {
        self.with_entry(thread, |entry| entry.parker.block());
    }

    fn thread_ready(&self, thread: ThreadId, priority: Priority) {
        self.with_entry(thread, |entry| {
            entry.priority = priority;
            entry.parker.unblock();
        });
    }

    fn priority_changed(&self, thread: ThreadId, priority: Priority) {
        log::trace!("{thread} runs at {priority}");
        self.with_entry(thread, |entry| entry.priority = priority);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_core::Handle;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn park_returns_once_unblocked() {
        let scheduler = Arc::new(HostScheduler::new());
        let id = ThreadId::from_parts(0, 0);
        scheduler.register(id, Priority::new(5));
        scheduler.thread_blocked(id);

        let waker = Arc::clone(&scheduler);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            waker.thread_ready(id, Priority::new(7));
        });

        scheduler.park(id);
        handle.join().unwrap();
        assert_eq!(scheduler.priority(id), Some(Priority::new(7)));
    }

    #[test]
    fn wake_before_park_is_not_lost() {
        let scheduler = HostScheduler::new();
        let id = ThreadId::from_parts(1, 0);
        scheduler.register(id, Priority::new(5));
        scheduler.thread_blocked(id);
        scheduler.thread_ready(id, Priority::new(5));
        scheduler.park(id);
    }
}
