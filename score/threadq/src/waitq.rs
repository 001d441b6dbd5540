//! Wait queues
//!
//! A wait queue is the ordered set of threads blocked on one resource. Its
//! discipline is fixed when the queue is created:
//!
//! - **FIFO**: strict arrival order, regardless of priority.
//! - **Priority**: highest effective priority first; threads of equal
//!   priority keep their arrival order.
//!
//! The queue only orders handles. Moving threads in and out of blocked
//! states is the job of [`ThreadQueueContext`](crate::ThreadQueueContext).

use heapless::Vec;
use score_core::{Priority, ThreadId, MAX_THREADS};

/// Ordering rule of a wait queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Discipline {
    Fifo,
    Priority,
}

#[derive(Debug, Clone, Copy)]
struct Waiter {
    thread: ThreadId,
    priority: Priority,
}

/// Threads blocked on one resource, in service order.
///
/// A thread is in at most one queue at a time, so a capacity of
/// [`MAX_THREADS`] can never be exceeded.
#[derive(Debug, Clone)]
pub struct WaitQueue {
    discipline: Discipline,
    waiters: Vec<Waiter, MAX_THREADS>,
}

impl WaitQueue {
    pub const fn new(discipline: Discipline) -> Self {
        Self {
            discipline,
            waiters: Vec::new(),
        }
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    pub fn contains(&self, thread: ThreadId) -> bool {
        self.position(thread).is_some()
    }

    /// The thread that would be served next.
    pub fn first(&self) -> Option<ThreadId> {
        self.waiters.first().map(|waiter| waiter.thread)
    }

    /// Waiting threads in service order.
    pub fn iter(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.waiters.iter().map(|waiter| waiter.thread)
    }

    /// Highest priority among the waiters, whatever the discipline.
    pub fn highest_priority(&self) -> Option<Priority> {
        match self.discipline {
            Discipline::Priority => self.waiters.first().map(|waiter| waiter.priority),
            Discipline::Fifo => self.waiters.iter().map(|waiter| waiter.priority).max(),
        }
    }

    /// Record a new priority for a waiting thread and restore the ordering.
    ///
    /// Under priority discipline the thread moves behind the threads already
    /// waiting at its new priority. Returns false if the thread is not here.
    pub fn reprioritize(&mut self, thread: ThreadId, priority: Priority) -> bool {
        let Some(index) = self.position(thread) else {
            return false;
        };
        match self.discipline {
            Discipline::Fifo => self.waiters[index].priority = priority,
            Discipline::Priority => {
                self.waiters.remove(index);
                self.insert(thread, priority);
            }
        }
        true
    }

    pub(crate) fn insert(&mut self, thread: ThreadId, priority: Priority) {
        debug_assert!(!self.contains(thread), "{thread} enqueued twice");
        let index = match self.discipline {
            Discipline::Fifo => self.waiters.len(),
            Discipline::Priority => self
                .waiters
                .iter()
                .position(|waiter| waiter.priority < priority)
                .unwrap_or(self.waiters.len()),
        };
        let inserted = self.waiters.insert(index, Waiter { thread, priority });
        assert!(inserted.is_ok(), "wait queue overflow");
    }

    pub(crate) fn pop_first(&mut self) -> Option<ThreadId> {
        if self.waiters.is_empty() {
            None
        } else {
            Some(self.waiters.remove(0).thread)
        }
    }

    pub(crate) fn remove(&mut self, thread: ThreadId) -> bool {
        match self.position(thread) {
            Some(index) => {
                self.waiters.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empty the queue, returning its members in service order.
    pub(crate) fn drain(&mut self) -> Vec<ThreadId, MAX_THREADS> {
        let drained = self.waiters.iter().map(|waiter| waiter.thread).collect();
        self.waiters.clear();
        drained
    }

    fn position(&self, thread: ThreadId) -> Option<usize> {
        self.waiters.iter().position(|waiter| waiter.thread == thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_core::{Arena, Handle};

    fn ids(n: usize) -> std::vec::Vec<ThreadId> {
        let mut arena: Arena<ThreadId, (), 8> = Arena::new();
        (0..n).map(|_| arena.insert_with(|_| ()).unwrap()).collect()
    }

    #[test]
    fn fifo_ignores_priority() {
        let t = ids(3);
        let mut queue = WaitQueue::new(Discipline::Fifo);
        queue.insert(t[0], Priority::new(1));
        queue.insert(t[1], Priority::new(99));
        queue.insert(t[2], Priority::new(50));

        assert_eq!(queue.iter().collect::<std::vec::Vec<_>>(), t);
        assert_eq!(queue.highest_priority(), Some(Priority::new(99)));
        assert_eq!(queue.pop_first(), Some(t[0]));
    }

    #[test]
    fn priority_is_stable_among_equals() {
        let t = ids(4);
        let mut queue = WaitQueue::new(Discipline::Priority);
        queue.insert(t[0], Priority::new(10));
        queue.insert(t[1], Priority::new(20));
        queue.insert(t[2], Priority::new(10));
        queue.insert(t[3], Priority::new(20));

        let order: std::vec::Vec<_> = queue.iter().collect();
        assert_eq!(order, vec![t[1], t[3], t[0], t[2]]);
        assert_eq!(queue.highest_priority(), Some(Priority::new(20)));
    }

    #[test]
    fn reprioritize_moves_behind_equals() {
        let t = ids(3);
        let mut queue = WaitQueue::new(Discipline::Priority);
        queue.insert(t[0], Priority::new(30));
        queue.insert(t[1], Priority::new(20));
        queue.insert(t[2], Priority::new(10));

        assert!(queue.reprioritize(t[2], Priority::new(30)));
        let order: std::vec::Vec<_> = queue.iter().collect();
        assert_eq!(order, vec![t[0], t[2], t[1]]);

        assert!(!queue.reprioritize(ThreadId::from_parts(7, 0), Priority::new(1)));
    }

    #[test]
    fn drain_empties_in_order() {
        let t = ids(3);
        let mut queue = WaitQueue::new(Discipline::Fifo);
        for id in &t {
            queue.insert(*id, Priority::new(1));
        }
        assert!(queue.remove(t[1]));
        assert!(!queue.remove(t[1]));

        let drained = queue.drain();
        assert_eq!(drained.as_slice(), &[t[0], t[2]]);
        assert!(queue.is_empty());
        assert_eq!(queue.first(), None);
    }
}
