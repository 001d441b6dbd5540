#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # SuperCore Mutex
//!
//! Mutual exclusion for a priority-preemptive kernel, built on the thread
//! queues of `score-threadq`.
//!
//! Each mutex fixes at creation time:
//!
//! - the **discipline** of its wait queue (FIFO or priority),
//! - the **protocol**: plain, priority inheritance, or priority ceiling,
//! - the **recursion** policy: nest, or report a self-deadlock.
//!
//! ```ignore
//! use score_core::Priority;
//! use score_mutex::{Kernel, MutexAttributes, Seize, Surrender};
//! use score_threadq::ThreadAttributes;
//!
//! let kernel = Kernel::builder().build();
//! let low = kernel.create_thread(ThreadAttributes::new(Priority::new(10)))?;
//! let high = kernel.create_thread(ThreadAttributes::new(Priority::new(90)))?;
//! let mutex = kernel.create_mutex(MutexAttributes::inherit())?;
//!
//! assert_eq!(kernel.acquire(mutex, low, None)?, Seize::Acquired);
//! assert_eq!(kernel.acquire(mutex, high, None)?, Seize::Blocked);
//! // low now runs at 90 until it lets go
//! assert_eq!(kernel.release(mutex, low)?, Surrender::HandedOff(high));
//! ```

pub mod attributes;
pub mod control;
mod flush;
pub mod kernel;
mod priority;
mod seize;
mod surrender;
pub mod table;
mod timeout;

pub use attributes::{MutexAttributes, Protocol, Recursion};
pub use control::CoreMutex;
pub use kernel::{Kernel, KernelBuilder, KernelState, MutexInfo, Seize, Surrender};
pub use table::MutexTable;
