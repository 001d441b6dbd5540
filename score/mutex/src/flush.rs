//! Flush, reset and destroy paths

use score_core::{MutexId, SyncError, SyncResult, ThreadId, ThreadState, WaitStatus};
use score_threadq::RemoteExtract;

use crate::attributes::Protocol;
use crate::kernel::{Gate, KernelState};

impl KernelState {
    /// Wake every waiter of `mutex_id` with `status`.
    ///
    /// Only [`WaitStatus::Deleted`] and [`WaitStatus::Reset`] are accepted;
    /// a grant or a timeout is never delivered by a flush.
    pub(crate) fn flush(
        &mut self,
        gate: Gate<'_, '_>,
        mutex_id: MutexId,
        status: WaitStatus,
        remote: Option<&dyn RemoteExtract>,
    ) -> SyncResult<usize> {
        if !status.is_flush() {
            return Err(SyncError::InvalidState);
        }
        let mutex = self.mutexes.get_mut(mutex_id)?;
        let remote = remote.unwrap_or(gate.remote);
        let woken = gate
            .queue(&mut self.threads)
            .flush_with(mutex.queue_mut(), status, remote);

        if let (Protocol::Inherit, Some(owner)) = (mutex.protocol(), mutex.owner()) {
            self.refresh_priority(gate, owner);
        }
        Ok(woken)
    }

    /// Flush ahead of a reset or destruction.
    ///
    /// Refused while a live thread owns the mutex. An owner that is gone or
    /// dormant loses the mutex first.
    pub(crate) fn flush_for_removal(
        &mut self,
        gate: Gate<'_, '_>,
        mutex_id: MutexId,
        status: WaitStatus,
    ) -> SyncResult<usize> {
        let owner = self.mutexes.get(mutex_id)?.owner();
        if let Some(owner) = owner {
            if self.is_live(owner) {
                return Err(SyncError::BusyOnDestroy);
            }
            log::warn!("{mutex_id} taken from inactive owner {owner}");
            self.mutexes.get_mut(mutex_id)?.disown();
            if let Ok(tcb) = self.threads.get_mut(owner) {
                tcb.resource_released();
            }
            self.refresh_priority(gate, owner);
        }
        self.flush(gate, mutex_id, status, None)
    }

    fn is_live(&self, thread: ThreadId) -> bool {
        self.threads
            .get(thread)
            .is_ok_and(|tcb| tcb.state() != ThreadState::Dormant)
    }
}
