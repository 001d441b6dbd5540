#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # SuperCore Interrupt Gate
//!
//! Disables interrupt delivery on the current processor for the extent of a
//! scope and restores exactly the prior state when the scope ends, on every
//! exit path.
//!
//! The gate is a thin layer over the [`critical_section`] crate. A target
//! provides the implementation (for example a Cortex-M `PRIMASK` save and
//! restore); host builds enable the `std` feature, which supplies a global
//! reentrant lock instead of masking interrupts.
//!
//! ```ignore
//! use core::cell::RefCell;
//! use score_isr::{IsrCell, IsrGuard};
//!
//! static COUNTER: IsrCell<u32> = IsrCell::new(RefCell::new(0));
//!
//! fn bump() {
//!     let gate = IsrGuard::enter();
//!     *COUNTER.borrow_ref_mut(gate.token()) += 1;
//! } // interrupts restored here
//! ```

use core::cell::RefCell;
use core::marker::PhantomData;

pub use critical_section::{CriticalSection, RestoreState};

/// State that may only be touched while the interrupt gate is held.
pub type IsrCell<T> = critical_section::Mutex<RefCell<T>>;

/// Scoped interrupt-disable guard.
///
/// Construction disables interrupts and records the previous mask state;
/// dropping the guard restores that state. Guards nest: an inner guard
/// restores "disabled", the outermost restores whatever was in effect
/// before it. The guard is neither `Send` nor `Sync`, since the saved state
/// belongs to the processor that created it.
#[must_use = "interrupts are re-enabled as soon as the guard is dropped"]
pub struct IsrGuard {
    restore: RestoreState,
    _not_send: PhantomData<*mut ()>,
}

impl IsrGuard {
    /// Disable interrupts on the current processor.
    #[inline]
    pub fn enter() -> Self {
        // SAFETY: the matching release happens exactly once, in `Drop`, with
        // the token returned here. Guards are dropped in reverse order of
        // creation because they are scope-bound and cannot leave the thread.
        let restore = unsafe { critical_section::acquire() };
        Self {
            restore,
            _not_send: PhantomData,
        }
    }

    /// Proof that the gate is held, for borrowing [`IsrCell`] contents.
    #[inline]
    pub fn token(&self) -> CriticalSection<'_> {
        // SAFETY: the returned token cannot outlive `self`, and interrupts
        // stay disabled for as long as `self` exists.
        unsafe { CriticalSection::new() }
    }
}

impl Drop for IsrGuard {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: `restore` came from the `acquire` in `enter`.
        unsafe { critical_section::release(self.restore) }
    }
}

/// Run `f` with the interrupt gate held.
#[inline]
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    let gate = IsrGuard::enter();
    f(gate.token())
}
