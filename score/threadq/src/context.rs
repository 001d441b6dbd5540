//! Thread queue operations
//!
//! [`ThreadQueueContext`] pairs the thread table with the scheduler and the
//! remote extraction strategy for the duration of one gated operation. It
//! can only be built from a [`CriticalSection`] token, so every state
//! transition below happens with the interrupt gate closed.

use critical_section::CriticalSection;
use heapless::Vec;
use score_core::{MutexId, Priority, SyncError, SyncResult, ThreadId, Ticks, WaitStatus, MAX_THREADS};

use crate::remote::RemoteExtract;
use crate::scheduler::Scheduler;
use crate::table::ThreadTable;
use crate::waitq::WaitQueue;

pub struct ThreadQueueContext<'a, 'cs> {
    cs: CriticalSection<'cs>,
    threads: &'a mut ThreadTable,
    scheduler: &'a dyn Scheduler,
    remote: &'a dyn RemoteExtract,
}

impl<'a, 'cs> ThreadQueueContext<'a, 'cs> {
    pub fn new(
        cs: CriticalSection<'cs>,
        threads: &'a mut ThreadTable,
        scheduler: &'a dyn Scheduler,
        remote: &'a dyn RemoteExtract,
    ) -> Self {
        Self {
            cs,
            threads,
            scheduler,
            remote,
        }
    }

    pub fn cs(&self) -> CriticalSection<'cs> {
        self.cs
    }

    pub fn threads(&self) -> &ThreadTable {
        self.threads
    }

    pub fn threads_mut(&mut self) -> &mut ThreadTable {
        self.threads
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler
    }

    /// Block `thread` on `queue`, which belongs to `object`.
    ///
    /// The thread is queued at its current effective priority. With a
    /// timeout its watchdog is armed and it waits in the timed state.
    pub fn enqueue(
        &mut self,
        queue: &mut WaitQueue,
        object: MutexId,
        thread: ThreadId,
        timeout: Option<Ticks>,
    ) -> SyncResult<()> {
        let local = self.threads.is_local(thread);
        let tcb = self.threads.get_mut(thread)?;
        if !tcb.state().is_ready() {
            return Err(SyncError::InvalidState);
        }
        tcb.begin_wait(object, timeout);
        queue.insert(thread, tcb.current_priority());
        log::trace!("{thread} waits on {object} at {}", tcb.current_priority());

        if local {
            self.scheduler.thread_blocked(thread);
        }
        Ok(())
    }

    /// Remove and wake the first waiter of `queue`.
    ///
    /// Handles that no longer resolve to a waiting thread are discarded.
    pub fn extract_first(&mut self, queue: &mut WaitQueue, status: WaitStatus) -> Option<ThreadId> {
        while let Some(thread) = queue.pop_first() {
            if self.wake(thread, status, self.remote) {
                return Some(thread);
            }
            log::debug!("dropping stale waiter {thread}");
        }
        None
    }

    /// Remove `thread` from `queue` and wake it with `status`.
    ///
    /// Returns false if the thread was not waiting there.
    pub fn extract(&mut self, queue: &mut WaitQueue, thread: ThreadId, status: WaitStatus) -> bool {
        queue.remove(thread) && self.wake(thread, status, self.remote)
    }

    /// Wake every waiter of `queue` with `status`, using the configured
    /// remote extraction strategy for proxies.
    pub fn flush(&mut self, queue: &mut WaitQueue, status: WaitStatus) -> usize {
        let remote = self.remote;
        self.flush_with(queue, status, remote)
    }

    /// Wake every waiter of `queue` with `status`.
    ///
    /// The membership is taken in one step, so the queue is empty before the
    /// first wake is delivered. Returns the number of threads woken.
    pub fn flush_with(
        &mut self,
        queue: &mut WaitQueue,
        status: WaitStatus,
        remote: &dyn RemoteExtract,
    ) -> usize {
        let waiters = queue.drain();
        let woken = waiters
            .into_iter()
            .filter(|&thread| self.wake(thread, status, remote))
            .count();
        log::debug!("flushed {woken} waiter(s) with {status}");
        woken
    }

    /// Change the effective priority of `thread` and tell the scheduler.
    ///
    /// The caller is responsible for reordering any queue the thread is in.
    pub fn change_priority(&mut self, thread: ThreadId, priority: Priority) -> SyncResult<bool> {
        let tcb = self.threads.get_mut(thread)?;
        if !tcb.set_current_priority(priority) {
            return Ok(false);
        }
        let current = tcb.current_priority();
        log::trace!("{thread} now runs at {current}");
        self.scheduler.priority_changed(thread, current);
        Ok(true)
    }

    /// Count one tick on every timed wait.
    ///
    /// Returns the threads whose watchdog fired. They are still blocked; the
    /// owner of each queue extracts them with [`WaitStatus::TimedOut`].
    pub fn expire_watchdogs(&mut self) -> Vec<ThreadId, MAX_THREADS> {
        let mut expired = Vec::new();
        for (id, tcb) in self.threads.iter_mut() {
            if tcb.tick_watchdog() {
                // at most one entry per thread
                assert!(expired.push(id).is_ok(), "expired list overflow");
            }
        }
        expired
    }

    fn wake(&mut self, thread: ThreadId, status: WaitStatus, remote: &dyn RemoteExtract) -> bool {
        let local_node = self.threads.local_node();
        let Ok(tcb) = self.threads.get_mut(thread) else {
            return false;
        };
        if tcb.end_wait(status).is_none() {
            return false;
        }

        if tcb.node() == local_node {
            self.scheduler.thread_ready(thread, tcb.current_priority());
        } else {
            remote.extract(thread, tcb.node(), status);
        }
        true
    }
}
