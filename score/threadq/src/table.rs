//! Thread table

use score_core::{Arena, NodeId, SyncError, SyncResult, ThreadId, MAX_THREADS};

use crate::tcb::{ThreadAttributes, ThreadControl};

/// Arena of thread control blocks, indexed by [`ThreadId`].
pub struct ThreadTable {
    arena: Arena<ThreadId, ThreadControl, MAX_THREADS>,
    local_node: NodeId,
}

impl ThreadTable {
    pub fn new(limit: usize, local_node: NodeId) -> Self {
        Self {
            arena: Arena::with_limit(limit),
            local_node,
        }
    }

    /// Register a thread created by the scheduler.
    pub fn create(&mut self, attributes: ThreadAttributes) -> SyncResult<ThreadId> {
        let id = self
            .arena
            .insert_with(|id| ThreadControl::new(id, attributes))
            .ok_or(SyncError::TooManyThreads)?;
        log::trace!("{id} created at {}", attributes.priority);
        Ok(id)
    }

    /// Drop the control block of a thread that is not waiting.
    pub fn remove(&mut self, id: ThreadId) -> SyncResult<ThreadControl> {
        if self.get(id)?.is_blocked() {
            return Err(SyncError::InvalidState);
        }
        self.arena.remove(id).ok_or(SyncError::InvalidThread)
    }

    pub fn get(&self, id: ThreadId) -> SyncResult<&ThreadControl> {
        self.arena.get(id).ok_or(SyncError::InvalidThread)
    }

    pub fn get_mut(&mut self, id: ThreadId) -> SyncResult<&mut ThreadControl> {
        self.arena.get_mut(id).ok_or(SyncError::InvalidThread)
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.arena.contains(id)
    }

    /// Returns true if `id` names a thread executing on this node.
    pub fn is_local(&self, id: ThreadId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|tcb| tcb.node() == self.local_node)
    }

    pub fn local_node(&self) -> NodeId {
        self.local_node
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThreadId, &ThreadControl)> + '_ {
        self.arena.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (ThreadId, &mut ThreadControl)> + '_ {
        self.arena.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
