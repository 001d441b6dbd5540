//! Object handles
//!
//! Threads and mutexes are never referenced by address. Each lives in a slot
//! of an [`Arena`](crate::Arena) and is named by a handle carrying the slot
//! index plus the slot generation at allocation time, so a handle that
//! outlives its object is detected instead of silently aliasing the slot's
//! next tenant.

use core::fmt;

use crate::arena::Handle;

/// Handle to a thread control block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThreadId {
    index: u16,
    generation: u16,
}

/// Handle to a mutex control block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MutexId {
    index: u16,
    generation: u16,
}

macro_rules! impl_handle {
    ($ty:ident, $tag:literal) => {
        impl Handle for $ty {
            fn from_parts(index: u16, generation: u16) -> Self {
                Self { index, generation }
            }

            fn index(&self) -> u16 {
                self.index
            }

            fn generation(&self) -> u16 {
                self.generation
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}.{}"), self.index, self.generation)
            }
        }
    };
}

impl_handle!(ThreadId, "thread");
impl_handle!(MutexId, "mutex");

/// Identifier of a processing node in a multiprocessor configuration.
///
/// A thread whose node differs from the kernel's local node is a proxy for
/// a thread executing elsewhere; waking it is delegated to a remote
/// extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(pub u16);

impl NodeId {
    /// Node of a single-processor build
    pub const LOCAL: NodeId = NodeId(1);
}

impl Default for NodeId {
    fn default() -> Self {
        Self::LOCAL
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}
