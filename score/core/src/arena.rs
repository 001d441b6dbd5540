//! Generation-checked object arena
//!
//! A fixed-capacity table of slots. Each slot remembers a generation that is
//! bumped whenever its occupant is removed, and every handle records the
//! generation it was issued with. Lookups with a stale handle fail.

use core::marker::PhantomData;

use heapless::Vec;

/// A handle that can name a slot in an [`Arena`].
pub trait Handle: Copy + Eq {
    /// Build a handle from its raw parts.
    fn from_parts(index: u16, generation: u16) -> Self;

    /// Slot index.
    fn index(&self) -> u16;

    /// Slot generation at the time the handle was issued.
    fn generation(&self) -> u16;
}

struct Slot<T> {
    generation: u16,
    value: Option<T>,
}

/// Fixed-capacity arena keyed by generation-checked handles.
///
/// `N` is the storage capacity; `limit` (at most `N`) is the number of slots
/// the arena is allowed to hand out, so a runtime configuration can shrink a
/// statically sized table.
pub struct Arena<K: Handle, T, const N: usize> {
    slots: Vec<Slot<T>, N>,
    len: usize,
    limit: usize,
    _key: PhantomData<K>,
}

impl<K: Handle, T, const N: usize> Arena<K, T, N> {
    /// Create an empty arena using its full capacity.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            limit: N,
            _key: PhantomData,
        }
    }

    /// Create an empty arena that hands out at most `limit` slots.
    pub fn with_limit(limit: usize) -> Self {
        let mut arena = Self::new();
        arena.limit = limit.min(N);
        arena
    }

    /// Insert a value built from its own handle.
    ///
    /// Returns `None` when every allowed slot is occupied.
    pub fn insert_with<F>(&mut self, build: F) -> Option<K>
    where
        F: FnOnce(K) -> T,
    {
        if self.len >= self.limit {
            return None;
        }

        let free = self.slots.iter().position(|slot| slot.value.is_none());
        let key = match free {
            Some(index) => {
                let slot = &mut self.slots[index];
                let key = K::from_parts(index as u16, slot.generation);
                slot.value = Some(build(key));
                key
            }
            None => {
                let index = self.slots.len();
                let key = K::from_parts(index as u16, 0);
                self.slots
                    .push(Slot {
                        generation: 0,
                        value: Some(build(key)),
                    })
                    .ok()?;
                key
            }
        };

        self.len += 1;
        Some(key)
    }

    /// Remove the value named by `key`, retiring the handle.
    pub fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slot_mut(key)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.len -= 1;
        Some(value)
    }

    /// Resolve a handle.
    pub fn get(&self, key: K) -> Option<&T> {
        let slot = self.slots.get(key.index() as usize)?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    /// Resolve a handle mutably.
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slot_mut(key)?.value.as_mut()
    }

    /// Returns true if `key` names a live object.
    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over live objects with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (K::from_parts(index as u16, slot.generation), value))
        })
    }

    /// Iterate mutably over live objects with their handles, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (K::from_parts(index as u16, generation), value))
        })
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no object is live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of live objects.
    pub fn limit(&self) -> usize {
        self.limit
    }

    fn slot_mut(&mut self, key: K) -> Option<&mut Slot<T>> {
        let slot = self.slots.get_mut(key.index() as usize)?;
        if slot.generation != key.generation() {
            return None;
        }
        Some(slot)
    }
}

impl<K: Handle, T, const N: usize> Default for Arena<K, T, N> {
    fn default() -> Self {
        Self::new()
    }
}
