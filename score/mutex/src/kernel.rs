//! Kernel facade
//!
//! [`Kernel`] owns the thread and mutex tables and exposes every operation
//! of the synchronization core. Each call closes the interrupt gate, does
//! its work on the tables, and opens the gate again before returning; no
//! call ever waits. A blocking acquire returns [`Seize::Blocked`] after the
//! caller has been queued and reported to the [`Scheduler`], which suspends
//! the thread. Once the scheduler runs it again, [`Kernel::wait_result`]
//! tells how the wait ended.
//!
//! Scheduler and remote extraction callbacks run with the gate closed and
//! must not call back into the kernel.

use core::cell::RefCell;
use core::time::Duration;

use critical_section::CriticalSection;
use heapless::Vec;
use score_core::{
    KernelConfig, MutexId, Priority, SyncError, SyncResult, ThreadId, Ticks, WaitStatus, MAX_THREADS,
};
use score_isr::{IsrCell, IsrGuard};
use score_threadq::{
    LocalExtract, NullScheduler, RemoteExtract, Scheduler, ThreadAttributes, ThreadControl,
    ThreadQueueContext, ThreadTable,
};

use crate::attributes::MutexAttributes;
use crate::table::MutexTable;

/// Result of a successful acquire call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Seize {
    /// The caller now owns the mutex.
    Acquired,
    /// The caller already owned the mutex; the new nesting depth.
    Nested(u32),
    /// The caller is queued; collect the outcome with [`Kernel::wait_result`].
    Blocked,
}

/// Result of a successful release call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Surrender {
    /// Still owned by the caller at this nesting depth.
    Nested(u32),
    /// Unlocked, nobody was waiting.
    Released,
    /// Ownership passed to this waiter.
    HandedOff(ThreadId),
}

/// How long an acquire may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wait {
    No,
    Forever,
    For(Ticks),
}

impl Wait {
    pub(crate) fn from_timeout(timeout: Option<Duration>, period: Duration) -> Self {
        match timeout {
            None => Wait::Forever,
            Some(duration) if duration.is_zero() => Wait::No,
            Some(duration) => Wait::For(Ticks::from_duration(duration, period)),
        }
    }
}

/// Snapshot of a mutex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutexInfo {
    pub id: MutexId,
    pub attributes: MutexAttributes,
    pub owner: Option<ThreadId>,
    pub nesting: u32,
    /// Waiting threads in service order.
    pub waiters: Vec<ThreadId, MAX_THREADS>,
}

/// The tables guarded by the interrupt gate.
pub struct KernelState {
    pub(crate) threads: ThreadTable,
    pub(crate) mutexes: MutexTable,
}

impl KernelState {
    fn new(config: &KernelConfig) -> Self {
        Self {
            threads: ThreadTable::new(config.max_threads, config.local_node),
            mutexes: MutexTable::new(config.max_mutexes),
        }
    }

    pub fn threads(&self) -> &ThreadTable {
        &self.threads
    }

    pub fn mutexes(&self) -> &MutexTable {
        &self.mutexes
    }
}

/// Collaborators of one gated operation.
#[derive(Clone, Copy)]
pub(crate) struct Gate<'a, 'cs> {
    pub(crate) cs: CriticalSection<'cs>,
    pub(crate) scheduler: &'a dyn Scheduler,
    pub(crate) remote: &'a dyn RemoteExtract,
}

impl<'a, 'cs> Gate<'a, 'cs> {
    pub(crate) fn queue<'t>(&self, threads: &'t mut ThreadTable) -> ThreadQueueContext<'t, 'cs>
    where
        'a: 't,
    {
        ThreadQueueContext::new(self.cs, threads, self.scheduler, self.remote)
    }
}

pub struct KernelBuilder<S = NullScheduler, R = LocalExtract> {
    config: KernelConfig,
    scheduler: S,
    remote: R,
}

impl KernelBuilder {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            scheduler: NullScheduler,
            remote: LocalExtract,
        }
    }
}

impl<S: Scheduler, R: RemoteExtract> KernelBuilder<S, R> {
    /// Scheduler notified of blocking, readiness and priority changes.
    pub fn scheduler<T: Scheduler>(self, scheduler: T) -> KernelBuilder<T, R> {
        KernelBuilder {
            config: self.config,
            scheduler,
            remote: self.remote,
        }
    }

    /// Default strategy for waking threads of other nodes.
    pub fn remote<T: RemoteExtract>(self, remote: T) -> KernelBuilder<S, T> {
        KernelBuilder {
            config: self.config,
            scheduler: self.scheduler,
            remote,
        }
    }

    pub fn build(self) -> Kernel<S, R> {
        log::debug!(
            "kernel '{}' up: {} threads, {} mutexes, node {}",
            self.config.name,
            self.config.max_threads,
            self.config.max_mutexes,
            self.config.local_node
        );
        Kernel {
            state: IsrCell::new(RefCell::new(KernelState::new(&self.config))),
            config: self.config,
            scheduler: self.scheduler,
            remote: self.remote,
        }
    }
}

pub struct Kernel<S = NullScheduler, R = LocalExtract> {
    config: KernelConfig,
    state: IsrCell<KernelState>,
    scheduler: S,
    remote: R,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new(KernelConfig::default())
    }

    pub fn with_config(config: KernelConfig) -> KernelBuilder {
        KernelBuilder::new(config)
    }
}

impl<S: Scheduler, R: RemoteExtract> Kernel<S, R> {
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Run `f` on the tables with the interrupt gate closed.
    fn gated<T>(&self, f: impl FnOnce(&mut KernelState, Gate<'_, '_>) -> T) -> T {
        let guard = IsrGuard::enter();
        let cs = guard.token();
        let mut state = self.state.borrow_ref_mut(cs);
        let gate = Gate {
            cs,
            scheduler: &self.scheduler,
            remote: &self.remote,
        };
        f(&mut state, gate)
    }

    /// Read the tables with the interrupt gate closed.
    pub fn inspect<T>(&self, f: impl FnOnce(&KernelState) -> T) -> T {
        let guard = IsrGuard::enter();
        let state = self.state.borrow_ref(guard.token());
        f(&state)
    }

    /// Register a thread the scheduler has created.
    pub fn create_thread(&self, attributes: ThreadAttributes) -> SyncResult<ThreadId> {
        self.gated(|state, _| state.threads.create(attributes))
    }

    /// Forget a thread. A waiting thread is first taken out of its queue.
    pub fn delete_thread(&self, thread: ThreadId) -> SyncResult<()> {
        self.gated(|state, gate| {
            let tcb = state.threads.get(thread)?;
            if tcb.resource_count() > 0 {
                log::warn!("{thread} deleted while holding {} mutex(es)", tcb.resource_count());
            }
            if let Some(object) = tcb.wait_object() {
                state.cancel_wait(gate, object, thread, WaitStatus::Deleted);
            }
            state.threads.remove(thread).map(drop)
        })
    }

    /// Ready → Dormant.
    pub fn suspend_thread(&self, thread: ThreadId) -> SyncResult<()> {
        self.gated(|state, _| state.threads.get_mut(thread)?.suspend())
    }

    /// Dormant → Ready.
    pub fn resume_thread(&self, thread: ThreadId) -> SyncResult<()> {
        self.gated(|state, _| state.threads.get_mut(thread)?.resume())
    }

    /// Change the scheduler-assigned priority of a thread.
    ///
    /// Boosts owed to mutexes the thread holds stay in force, and a waiting
    /// thread is repositioned in its queue.
    pub fn set_base_priority(&self, thread: ThreadId, priority: Priority) -> SyncResult<()> {
        self.gated(|state, gate| {
            state.threads.get_mut(thread)?.set_base_priority(priority);
            state.refresh_priority(gate, thread);
            Ok(())
        })
    }

    pub fn thread_info(&self, thread: ThreadId) -> SyncResult<ThreadControl> {
        self.inspect(|state| state.threads.get(thread).cloned())
    }

    /// Outcome of the last wait of `thread`.
    ///
    /// `Ok` if the mutex was handed over (or the thread never waited),
    /// otherwise the reason the wait ended. `Pending` while still waiting.
    pub fn wait_result(&self, thread: ThreadId) -> SyncResult<()> {
        self.inspect(|state| {
            let tcb = state.threads.get(thread)?;
            if tcb.is_blocked() {
                return Err(SyncError::Pending);
            }
            match tcb.wait_status() {
                None | Some(WaitStatus::Granted) => Ok(()),
                Some(WaitStatus::TimedOut) => Err(SyncError::TimedOut),
                Some(WaitStatus::Deleted) => Err(SyncError::Deleted),
                Some(WaitStatus::Reset) => Err(SyncError::Reset),
            }
        })
    }

    pub fn create_mutex(&self, attributes: MutexAttributes) -> SyncResult<MutexId> {
        self.gated(|state, _| {
            let id = state.mutexes.create(attributes)?;
            log::trace!("{id} created: {attributes:?}");
            Ok(id)
        })
    }

    /// Acquire `mutex` for `thread`.
    ///
    /// `timeout` bounds the wait: `None` waits forever, `Some(Duration::ZERO)`
    /// never waits and fails with [`SyncError::Unavailable`] instead.
    pub fn acquire(
        &self,
        mutex: MutexId,
        thread: ThreadId,
        timeout: Option<Duration>,
    ) -> SyncResult<Seize> {
        let wait = Wait::from_timeout(timeout, self.config.tick_period);
        self.gated(|state, gate| state.seize(gate, mutex, thread, wait))
    }

    /// Acquire `mutex` only if that needs no wait.
    pub fn try_acquire(&self, mutex: MutexId, thread: ThreadId) -> SyncResult<Seize> {
        self.gated(|state, gate| state.seize(gate, mutex, thread, Wait::No))
    }

    pub fn release(&self, mutex: MutexId, thread: ThreadId) -> SyncResult<Surrender> {
        self.gated(|state, gate| state.surrender(gate, mutex, thread))
    }

    /// Wake every waiter of `mutex` with `status`, whoever owns it.
    ///
    /// Waiters on other nodes are handed to `remote`, or to the kernel's
    /// default strategy. Returns the number of threads woken. `status` must
    /// be [`WaitStatus::Deleted`] or [`WaitStatus::Reset`], otherwise
    /// [`SyncError::InvalidState`] is returned and nobody is woken.
    pub fn flush(
        &self,
        mutex: MutexId,
        status: WaitStatus,
        remote: Option<&dyn RemoteExtract>,
    ) -> SyncResult<usize> {
        self.gated(|state, gate| state.flush(gate, mutex, status, remote))
    }

    /// Reset `mutex`: wake its waiters with [`WaitStatus::Reset`].
    ///
    /// Fails with [`SyncError::BusyOnDestroy`] while a live thread holds it.
    pub fn flush_mutex(&self, mutex: MutexId) -> SyncResult<usize> {
        self.gated(|state, gate| state.flush_for_removal(gate, mutex, WaitStatus::Reset))
    }

    /// Destroy `mutex`, waking its waiters with [`WaitStatus::Deleted`].
    ///
    /// Fails with [`SyncError::BusyOnDestroy`] while a live thread holds it.
    pub fn destroy_mutex(&self, mutex: MutexId) -> SyncResult<usize> {
        self.gated(|state, gate| {
            let woken = state.flush_for_removal(gate, mutex, WaitStatus::Deleted)?;
            state.mutexes.remove(mutex)?;
            log::debug!("{mutex} destroyed");
            Ok(woken)
        })
    }

    pub fn mutex_info(&self, mutex: MutexId) -> SyncResult<MutexInfo> {
        self.inspect(|state| {
            let control = state.mutexes.get(mutex)?;
            Ok(MutexInfo {
                id: control.id(),
                attributes: control.attributes(),
                owner: control.owner(),
                nesting: control.nesting(),
                waiters: control.queue().iter().collect(),
            })
        })
    }

    /// Advance every timed wait by one tick. Returns the number of waits
    /// that timed out.
    pub fn tick(&self) -> usize {
        self.gated(|state, gate| state.tick(gate))
    }
}
