#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # SuperCore Core
//!
//! Core types shared by the SuperCore synchronization layers: thread
//! priorities, generation-checked handles and the arena that resolves them,
//! thread states and wait statuses, tick counters, kernel configuration and
//! the common error type.
//!
//! Nothing in this crate touches the interrupt gate; the types here are plain
//! data that the upper layers mutate while the gate is held.

pub mod arena;
pub mod config;
pub mod error;
pub mod ids;
pub mod priorities;
pub mod states;
pub mod time;

pub use arena::{Arena, Handle};
pub use config::{KernelConfig, KernelConfigBuilder, MAX_MUTEXES, MAX_THREADS};
pub use error::{SyncError, SyncResult};
pub use ids::{MutexId, NodeId, ThreadId};
pub use priorities::Priority;
pub use states::{ThreadState, WaitStatus};
pub use time::Ticks;

/// SuperCore version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
