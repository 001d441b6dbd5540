//! Mutex control blocks

use score_core::{MutexId, Priority, ThreadId};
use score_threadq::WaitQueue;

use crate::attributes::{MutexAttributes, Protocol, Recursion};

/// The mutual exclusion object: ownership, nesting and its wait queue.
///
/// `owner` is `None` exactly when `nesting` is zero.
#[derive(Debug, Clone)]
pub struct CoreMutex {
    id: MutexId,
    attributes: MutexAttributes,
    owner: Option<ThreadId>,
    nesting: u32,
    queue: WaitQueue,
}

impl CoreMutex {
    pub(crate) fn new(id: MutexId, attributes: MutexAttributes) -> Self {
        Self {
            id,
            attributes,
            owner: None,
            nesting: 0,
            queue: WaitQueue::new(attributes.discipline),
        }
    }

    pub fn id(&self) -> MutexId {
        self.id
    }

    pub fn attributes(&self) -> MutexAttributes {
        self.attributes
    }

    pub fn protocol(&self) -> Protocol {
        self.attributes.protocol
    }

    pub fn recursion(&self) -> Recursion {
        self.attributes.recursion
    }

    pub fn owner(&self) -> Option<ThreadId> {
        self.owner
    }

    pub fn nesting(&self) -> u32 {
        self.nesting
    }

    pub fn is_locked(&self) -> bool {
        self.owner.is_some()
    }

    pub fn is_owned_by(&self, thread: ThreadId) -> bool {
        self.owner == Some(thread)
    }

    pub fn queue(&self) -> &WaitQueue {
        &self.queue
    }

    pub(crate) fn queue_mut(&mut self) -> &mut WaitQueue {
        &mut self.queue
    }

    /// Minimum effective priority this mutex imposes on its owner.
    pub fn obligation(&self) -> Option<Priority> {
        if !self.is_locked() {
            return None;
        }
        match self.attributes.protocol {
            Protocol::Plain => None,
            Protocol::Inherit => self.queue.highest_priority(),
            Protocol::Ceiling(ceiling) => Some(ceiling),
        }
    }

    pub(crate) fn grant(&mut self, thread: ThreadId) {
        debug_assert!(self.owner.is_none(), "{} granted while held", self.id);
        self.owner = Some(thread);
        self.nesting = 1;
    }

    pub(crate) fn nest(&mut self) -> u32 {
        self.nesting += 1;
        self.nesting
    }

    /// Drop one level of nesting; returns the remaining depth.
    pub(crate) fn unnest(&mut self) -> u32 {
        self.nesting = self.nesting.saturating_sub(1);
        if self.nesting == 0 {
            self.owner = None;
        }
        self.nesting
    }

    /// Forget the owner regardless of nesting.
    pub(crate) fn disown(&mut self) -> Option<ThreadId> {
        self.nesting = 0;
        self.owner.take()
    }
}
