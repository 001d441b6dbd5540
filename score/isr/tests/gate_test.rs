//! The gate must reopen on every exit path, including unwinding.

use std::cell::RefCell;
use std::panic;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use score_isr::{IsrCell, IsrGuard};

static LOG: IsrCell<Vec<&'static str>> = IsrCell::new(RefCell::new(Vec::new()));

fn gate_is_open() -> bool {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        score_isr::with(|_| ());
        let _ = tx.send(());
    });
    rx.recv_timeout(Duration::from_secs(2)).is_ok()
}

#[test]
fn gate_reopens_after_panic() {
    let result = panic::catch_unwind(|| {
        let gate = IsrGuard::enter();
        LOG.borrow_ref_mut(gate.token()).push("inside");
        panic!("fault inside the critical section");
    });
    assert!(result.is_err());
    assert!(gate_is_open());

    score_isr::with(|cs| assert_eq!(LOG.borrow_ref(cs).as_slice(), &["inside"]));
}

#[test]
fn with_returns_closure_value() {
    let doubled = score_isr::with(|_| 21 * 2);
    assert_eq!(doubled, 42);
    assert!(gate_is_open());
}
