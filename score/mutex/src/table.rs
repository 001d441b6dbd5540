//! Mutex table

use score_core::{Arena, MutexId, SyncError, SyncResult, ThreadId, MAX_MUTEXES};

use crate::attributes::MutexAttributes;
use crate::control::CoreMutex;

/// Arena of mutex control blocks, indexed by [`MutexId`].
pub struct MutexTable {
    arena: Arena<MutexId, CoreMutex, MAX_MUTEXES>,
}

impl MutexTable {
    pub fn new(limit: usize) -> Self {
        Self {
            arena: Arena::with_limit(limit),
        }
    }

    pub fn create(&mut self, attributes: MutexAttributes) -> SyncResult<MutexId> {
        attributes.validate()?;
        self.arena
            .insert_with(|id| CoreMutex::new(id, attributes))
            .ok_or(SyncError::TooManyMutexes)
    }

    pub(crate) fn remove(&mut self, id: MutexId) -> SyncResult<CoreMutex> {
        self.arena.remove(id).ok_or(SyncError::InvalidMutex)
    }

    pub fn get(&self, id: MutexId) -> SyncResult<&CoreMutex> {
        self.arena.get(id).ok_or(SyncError::InvalidMutex)
    }

    pub(crate) fn get_mut(&mut self, id: MutexId) -> SyncResult<&mut CoreMutex> {
        self.arena.get_mut(id).ok_or(SyncError::InvalidMutex)
    }

    /// Mutexes currently owned by `thread`.
    pub fn held_by(&self, thread: ThreadId) -> impl Iterator<Item = &CoreMutex> + '_ {
        self.arena
            .iter()
            .map(|(_, mutex)| mutex)
            .filter(move |mutex| mutex.is_owned_by(thread))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
