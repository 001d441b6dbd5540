//! Thread control blocks
//!
//! The synchronization core keeps only the part of a thread it needs: its
//! priorities, its blocking state, the object it waits on and the outcome of
//! its last wait. Everything else about the thread belongs to the scheduler.
//!
//! State transitions:
//!
//! ```text
//!            begin_wait                     end_wait(status)
//!   Ready ──────────────► Blocked* ─────────────────────────► Ready
//!     │  ▲                 (*with timeout: BlockedWithTimeout)
//!     │  │ resume
//!     ▼  │
//!   Dormant
//! ```
//!
//! `end_wait` is the only way out of a blocked state and succeeds once per
//! episode: a second caller (a timer racing a grant, say) finds the thread
//! already Ready and gets `None` back, so a thread can never be woken twice
//! for the same wait.

use score_core::{
    MutexId, NodeId, Priority, SyncError, SyncResult, ThreadId, ThreadState, Ticks, WaitStatus,
};

use crate::watchdog::Watchdog;

/// Creation-time attributes of a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAttributes {
    pub priority: Priority,
    pub node: NodeId,
}

impl ThreadAttributes {
    /// A local thread at `priority`.
    pub const fn new(priority: Priority) -> Self {
        Self {
            priority,
            node: NodeId::LOCAL,
        }
    }

    /// Place the thread on another node, making it a proxy.
    pub const fn on_node(mut self, node: NodeId) -> Self {
        self.node = node;
        self
    }
}

/// Per-thread state consulted and mutated by the synchronization core.
#[derive(Debug, Clone)]
pub struct ThreadControl {
    id: ThreadId,
    node: NodeId,
    base_priority: Priority,
    current_priority: Priority,
    state: ThreadState,
    wait_object: Option<MutexId>,
    wait_status: Option<WaitStatus>,
    watchdog: Watchdog,
    resource_count: u32,
}

impl ThreadControl {
    pub(crate) fn new(id: ThreadId, attributes: ThreadAttributes) -> Self {
        Self {
            id,
            node: attributes.node,
            base_priority: attributes.priority,
            current_priority: attributes.priority,
            state: ThreadState::Ready,
            wait_object: None,
            wait_status: None,
            watchdog: Watchdog::new(),
            resource_count: 0,
        }
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Priority assigned by the scheduler.
    pub fn base_priority(&self) -> Priority {
        self.base_priority
    }

    /// Effective priority, possibly boosted by held resources.
    pub fn current_priority(&self) -> Priority {
        self.current_priority
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn is_blocked(&self) -> bool {
        self.state.is_blocked()
    }

    /// The object this thread is blocked on, if any.
    pub fn wait_object(&self) -> Option<MutexId> {
        self.wait_object
    }

    /// Outcome of the last completed wait; `None` while a wait is pending.
    pub fn wait_status(&self) -> Option<WaitStatus> {
        self.wait_status
    }

    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    /// Number of resources currently held.
    pub fn resource_count(&self) -> u32 {
        self.resource_count
    }

    /// Set the scheduler-assigned priority.
    ///
    /// The effective priority is not touched; the owner of the priority
    /// bookkeeping recomputes it afterwards.
    pub fn set_base_priority(&mut self, priority: Priority) {
        self.base_priority = priority;
    }

    /// Set the effective priority, never below the base priority.
    ///
    /// Returns true if the effective priority changed.
    pub fn set_current_priority(&mut self, priority: Priority) -> bool {
        let priority = priority.max(self.base_priority);
        let changed = priority != self.current_priority;
        self.current_priority = priority;
        changed
    }

    pub fn resource_acquired(&mut self) {
        self.resource_count += 1;
    }

    pub fn resource_released(&mut self) {
        debug_assert!(self.resource_count > 0, "{} released more than it held", self.id);
        self.resource_count = self.resource_count.saturating_sub(1);
    }

    /// Ready → Dormant, on behalf of the scheduler.
    pub fn suspend(&mut self) -> SyncResult<()> {
        match self.state {
            ThreadState::Ready => {
                self.state = ThreadState::Dormant;
                Ok(())
            }
            _ => Err(SyncError::InvalidState),
        }
    }

    /// Dormant → Ready, on behalf of the scheduler.
    pub fn resume(&mut self) -> SyncResult<()> {
        match self.state {
            ThreadState::Dormant => {
                self.state = ThreadState::Ready;
                Ok(())
            }
            _ => Err(SyncError::InvalidState),
        }
    }

    /// Start a blocking episode on `object`, optionally bounded.
    pub(crate) fn begin_wait(&mut self, object: MutexId, timeout: Option<Ticks>) {
        assert!(
            self.state.is_ready(),
            "{} cannot block while {}",
            self.id,
            self.state
        );
        self.state = ThreadState::BlockedOnResource;
        self.wait_object = Some(object);
        self.wait_status = None;
        if let Some(interval) = timeout {
            self.watchdog.arm(interval);
            self.state = ThreadState::BlockedWithTimeout;
        }
    }

    /// End the current blocking episode with `status`.
    ///
    /// Returns the object waited on, or `None` if the episode already ended.
    pub(crate) fn end_wait(&mut self, status: WaitStatus) -> Option<MutexId> {
        if !self.state.is_blocked() {
            return None;
        }
        self.watchdog.disarm();
        self.state = ThreadState::Ready;
        self.wait_status = Some(status);
        self.wait_object.take()
    }

    /// Count one tick on the watchdog of a timed wait.
    pub(crate) fn tick_watchdog(&mut self) -> bool {
        self.state == ThreadState::BlockedWithTimeout && self.watchdog.tick()
    }
}
