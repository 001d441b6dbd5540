//! Acquire path

use score_core::{MutexId, SyncError, SyncResult, ThreadId};

use crate::attributes::{Protocol, Recursion};
use crate::kernel::{Gate, KernelState, Seize, Wait};

impl KernelState {
    pub(crate) fn seize(
        &mut self,
        gate: Gate<'_, '_>,
        mutex_id: MutexId,
        thread: ThreadId,
        wait: Wait,
    ) -> SyncResult<Seize> {
        let caller = self.threads.get(thread)?;
        if !caller.state().is_ready() {
            return Err(SyncError::InvalidState);
        }
        let caller_priority = caller.current_priority();

        let mutex = self.mutexes.get_mut(mutex_id)?;
        if mutex.is_owned_by(thread) {
            return match mutex.recursion() {
                Recursion::Allowed => {
                    let depth = mutex.nest();
                    log::trace!("{thread} nests {mutex_id} to depth {depth}");
                    Ok(Seize::Nested(depth))
                }
                Recursion::Forbidden => Err(SyncError::SelfDeadlock),
            };
        }

        if let Protocol::Ceiling(ceiling) = mutex.protocol() {
            if caller_priority > ceiling {
                log::debug!("{thread} at {caller_priority} exceeds ceiling {ceiling} of {mutex_id}");
                return Err(SyncError::CeilingViolated);
            }
        }

        let Some(owner) = mutex.owner() else {
            mutex.grant(thread);
            self.threads.get_mut(thread)?.resource_acquired();
            log::debug!("{thread} acquires {mutex_id}");
            self.refresh_priority(gate, thread);
            return Ok(Seize::Acquired);
        };

        let timeout = match wait {
            Wait::No => return Err(SyncError::Unavailable),
            Wait::Forever => None,
            Wait::For(ticks) => Some(ticks),
        };

        let protocol = mutex.protocol();
        gate.queue(&mut self.threads)
            .enqueue(mutex.queue_mut(), mutex_id, thread, timeout)?;
        log::debug!("{thread} blocks on {mutex_id} held by {owner}");

        if protocol == Protocol::Inherit {
            self.refresh_priority(gate, owner);
        }
        Ok(Seize::Blocked)
    }
}
