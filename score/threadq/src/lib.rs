#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

//! # SuperCore Thread Queues
//!
//! The blocking machinery the SuperCore mutex is built on:
//!
//! - [`tcb`] – thread control blocks and the per-thread state machine
//! - [`table`] – the arena of thread control blocks
//! - [`waitq`] – ordered wait queues with FIFO or priority discipline
//! - [`context`] – enqueue, extraction, flush and timeout processing, run
//!   under the interrupt gate
//! - [`watchdog`] – per-wait timers
//! - [`scheduler`] – the interface consumed from the host scheduler
//! - [`remote`] – the strategy that completes wakes of remote threads
//!
//! Wait queues store thread handles only. A thread's record of the object it
//! waits on is likewise a handle, resolved by the layer that owns the
//! object, so no cyclic ownership exists between threads and queues.

pub mod context;
pub mod remote;
pub mod scheduler;
pub mod table;
pub mod tcb;
pub mod waitq;
pub mod watchdog;

pub use context::ThreadQueueContext;
pub use remote::{LocalExtract, RemoteExtract};
pub use scheduler::{NullScheduler, Scheduler};
pub use table::ThreadTable;
pub use tcb::{ThreadAttributes, ThreadControl};
pub use waitq::{Discipline, WaitQueue};
pub use watchdog::Watchdog;
