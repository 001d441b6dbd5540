//! Priority protocol bookkeeping
//!
//! A thread's effective priority is the maximum of its base priority and the
//! obligation of every mutex it currently owns: the ceiling of a ceiling
//! mutex, the highest waiter of an inheritance mutex. It is recomputed from
//! scratch after anything that can change one of those inputs, so releasing
//! one of several held mutexes keeps the boosts the others still require.
//!
//! A change is pushed along the chain of inheritance mutexes: if the thread
//! is itself waiting on an inheritance mutex, it is repositioned in that
//! queue and the owner there is recomputed in turn.

use core::cmp;

use score_core::{Priority, ThreadId};

use crate::attributes::Protocol;
use crate::kernel::{Gate, KernelState};

impl KernelState {
    /// Effective priority `thread` is owed, or `None` for a stale handle.
    pub(crate) fn required_priority(&self, thread: ThreadId) -> Option<Priority> {
        let base = self.threads.get(thread).ok()?.base_priority();
        let required = self
            .mutexes
            .held_by(thread)
            .filter_map(|mutex| mutex.obligation())
            .fold(base, cmp::max);
        Some(required)
    }

    /// Recompute the effective priority of `thread` and propagate any change.
    pub(crate) fn refresh_priority(&mut self, gate: Gate<'_, '_>, thread: ThreadId) {
        let mut thread = thread;
        // each hop crosses a distinct held mutex unless the owners deadlock
        for _ in 0..=self.mutexes.len() {
            let Some(required) = self.required_priority(thread) else {
                return;
            };
            let mut queue = gate.queue(&mut self.threads);
            if !matches!(queue.change_priority(thread, required), Ok(true)) {
                return;
            }
            let Ok(tcb) = queue.threads().get(thread) else {
                return;
            };
            let current = tcb.current_priority();
            let Some(object) = tcb.wait_object() else {
                return;
            };

            let Ok(mutex) = self.mutexes.get_mut(object) else {
                return;
            };
            mutex.queue_mut().reprioritize(thread, current);
            log::debug!("{thread} repositioned on {object} at {current}");

            match (mutex.protocol(), mutex.owner()) {
                (Protocol::Inherit, Some(owner)) => thread = owner,
                _ => return,
            }
        }
        log::warn!("priority propagation stopped at {thread}: circular wait");
    }
}
