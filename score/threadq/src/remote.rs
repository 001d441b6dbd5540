//! Remote extraction
//!
//! A thread whose node differs from the local node is a proxy: it waits here
//! on behalf of a thread running elsewhere. Waking a proxy updates its local
//! record and then hands the wake to a [`RemoteExtract`] strategy, which is
//! responsible for delivering it to the owning node.

use score_core::{NodeId, ThreadId, WaitStatus};

/// Completes the wake of a thread that lives on another node.
pub trait RemoteExtract {
    fn extract(&self, thread: ThreadId, node: NodeId, status: WaitStatus);
}

/// Strategy for single-node systems. Proxies should never exist, so a call
/// is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExtract;

impl RemoteExtract for LocalExtract {
    fn extract(&self, thread: ThreadId, node: NodeId, status: WaitStatus) {
        log::warn!("no remote extraction for {thread} on node {node} ({status})");
    }
}

impl<F> RemoteExtract for F
where
    F: Fn(ThreadId, NodeId, WaitStatus),
{
    fn extract(&self, thread: ThreadId, node: NodeId, status: WaitStatus) {
        self(thread, node, status)
    }
}
