//! Timeout processing

use score_core::{MutexId, ThreadId, WaitStatus};

use crate::attributes::Protocol;
use crate::kernel::{Gate, KernelState};

impl KernelState {
    /// Advance the watchdogs and time out every wait that expired.
    pub(crate) fn tick(&mut self, gate: Gate<'_, '_>) -> usize {
        let expired = gate.queue(&mut self.threads).expire_watchdogs();
        let mut timed_out = 0;
        for thread in expired {
            let Some(object) = self.threads.get(thread).ok().and_then(|tcb| tcb.wait_object()) else {
                continue;
            };
            if self.cancel_wait(gate, object, thread, WaitStatus::TimedOut) {
                log::debug!("{thread} timed out on {object}");
                timed_out += 1;
            }
        }
        timed_out
    }

    /// Take `thread` out of the queue of `object` and end its wait.
    ///
    /// The owner of an inheritance mutex loses whatever boost the thread
    /// was lending it.
    pub(crate) fn cancel_wait(
        &mut self,
        gate: Gate<'_, '_>,
        object: MutexId,
        thread: ThreadId,
        status: WaitStatus,
    ) -> bool {
        let Ok(mutex) = self.mutexes.get_mut(object) else {
            log::warn!("{thread} waits on missing {object}");
            return false;
        };
        if !gate
            .queue(&mut self.threads)
            .extract(mutex.queue_mut(), thread, status)
        {
            return false;
        }

        if let (Protocol::Inherit, Some(owner)) = (mutex.protocol(), mutex.owner()) {
            self.refresh_priority(gate, owner);
        }
        true
    }
}
