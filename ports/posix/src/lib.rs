//! Host port of the SuperCore synchronization kernel.
//!
//! Runs the kernel inside an ordinary process: every kernel thread is backed
//! by an OS thread, [`HostKernel::lock`] really suspends the calling OS
//! thread until the mutex is handed over, the wait times out, or the mutex
//! is flushed, and a [`Ticker`] thread advances the watchdogs.
//!
//! The interrupt gate is provided by the `std` implementation of
//! `critical-section`, a process-wide reentrant lock.
//!
//! ```no_run
//! use std::time::Duration;
//! use score_core::{KernelConfig, Priority};
//! use score_mutex::MutexAttributes;
//! use score_posix::HostKernel;
//!
//! let host = HostKernel::new(KernelConfig::default());
//! let _ticker = host.start_ticker();
//! let mutex = host.kernel().create_mutex(MutexAttributes::inherit()).unwrap();
//! let me = host.create_thread(Priority::new(10)).unwrap();
//!
//! host.lock(mutex, me, Some(Duration::from_millis(100))).unwrap();
//! host.unlock(mutex, me).unwrap();
//! ```

use std::sync::Arc;
use std::time::Duration;

use score_core::{KernelConfig, MutexId, Priority, SyncError, SyncResult, ThreadId};
use score_mutex::{Kernel, Seize, Surrender};
use score_threadq::ThreadAttributes;

pub mod scheduler;
pub mod ticker;

pub use scheduler::HostScheduler;
pub use ticker::Ticker;

/// Kernel instance shared between OS threads.
#[derive(Clone)]
pub struct HostKernel {
    kernel: Arc<Kernel<HostScheduler>>,
}

impl HostKernel {
    pub fn new(config: KernelConfig) -> Self {
        let kernel = Kernel::with_config(config)
            .scheduler(HostScheduler::new())
            .build();
        Self {
            kernel: Arc::new(kernel),
        }
    }

    pub fn kernel(&self) -> &Kernel<HostScheduler> {
        &self.kernel
    }

    /// Start advancing timed waits at the configured tick period.
    pub fn start_ticker(&self) -> Ticker {
        Ticker::start(Arc::clone(&self.kernel))
    }

    /// Register a kernel thread for the calling (or any) OS thread.
    pub fn create_thread(&self, priority: Priority) -> SyncResult<ThreadId> {
        let thread = self.kernel.create_thread(ThreadAttributes::new(priority))?;
        self.kernel.scheduler().register(thread, priority);
        Ok(thread)
    }

    pub fn delete_thread(&self, thread: ThreadId) -> SyncResult<()> {
        self.kernel.delete_thread(thread)?;
        self.kernel.scheduler().unregister(thread);
        Ok(())
    }

    /// Acquire `mutex`, suspending the calling OS thread while it waits.
    ///
    /// `timeout` follows [`Kernel::acquire`]. Timed waits only expire while
    /// a [`Ticker`] is running. If `thread` is deleted while it waits, the
    /// call returns [`SyncError::Deleted`].
    pub fn lock(&self, mutex: MutexId, thread: ThreadId, timeout: Option<Duration>) -> SyncResult<()> {
        match self.kernel.acquire(mutex, thread, timeout)? {
            Seize::Acquired | Seize::Nested(_) => Ok(()),
            Seize::Blocked => {
                self.kernel.scheduler().park(thread);
                match self.kernel.wait_result(thread) {
                    // only a delete removes a waiting thread
                    Err(SyncError::InvalidThread) => Err(SyncError::Deleted),
                    result => result,
                }
            }
        }
    }

    pub fn unlock(&self, mutex: MutexId, thread: ThreadId) -> SyncResult<Surrender> {
        self.kernel.release(mutex, thread)
    }

    /// Effective priority of `thread`.
    pub fn priority(&self, thread: ThreadId) -> SyncResult<Priority> {
        Ok(self.kernel.thread_info(thread)?.current_priority())
    }
}
