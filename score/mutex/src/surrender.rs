//! Release path

use score_core::{MutexId, SyncError, SyncResult, ThreadId, WaitStatus};

use crate::kernel::{Gate, KernelState, Surrender};

impl KernelState {
    pub(crate) fn surrender(
        &mut self,
        gate: Gate<'_, '_>,
        mutex_id: MutexId,
        thread: ThreadId,
    ) -> SyncResult<Surrender> {
        self.threads.get(thread)?;
        let mutex = self.mutexes.get_mut(mutex_id)?;
        if !mutex.is_owned_by(thread) {
            return Err(SyncError::NotOwner);
        }

        let depth = mutex.unnest();
        if depth > 0 {
            log::trace!("{thread} unnests {mutex_id} to depth {depth}");
            return Ok(Surrender::Nested(depth));
        }

        let heir = gate
            .queue(&mut self.threads)
            .extract_first(mutex.queue_mut(), WaitStatus::Granted);
        if let Some(heir) = heir {
            mutex.grant(heir);
        }

        self.threads.get_mut(thread)?.resource_released();
        self.refresh_priority(gate, thread);

        match heir {
            Some(heir) => {
                self.threads.get_mut(heir)?.resource_acquired();
                self.refresh_priority(gate, heir);
                log::debug!("{thread} hands {mutex_id} to {heir}");
                Ok(Surrender::HandedOff(heir))
            }
            None => {
                log::debug!("{thread} releases {mutex_id}");
                Ok(Surrender::Released)
            }
        }
    }
}
