//! End-to-end acquire/release scenarios.

mod common;

use std::time::Duration;

use common::{effective, kernel, thread, Event};
use score_core::{Priority, SyncError, ThreadState};
use score_mutex::{MutexAttributes, Protocol, Recursion, Seize, Surrender};
use score_threadq::Discipline;

#[test]
fn fifo_handoff_in_arrival_order() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let t1 = thread(&kernel, 10);
    let t2 = thread(&kernel, 20);
    let t3 = thread(&kernel, 30);

    assert_eq!(kernel.acquire(mutex, t1, None), Ok(Seize::Acquired));
    assert_eq!(kernel.acquire(mutex, t2, None), Ok(Seize::Blocked));
    assert_eq!(kernel.acquire(mutex, t3, None), Ok(Seize::Blocked));

    assert_eq!(kernel.release(mutex, t1), Ok(Surrender::HandedOff(t2)));
    assert_eq!(kernel.wait_result(t2), Ok(()));
    assert_eq!(kernel.wait_result(t3), Err(SyncError::Pending));

    assert_eq!(kernel.release(mutex, t2), Ok(Surrender::HandedOff(t3)));
    assert_eq!(kernel.release(mutex, t3), Ok(Surrender::Released));

    let info = kernel.mutex_info(mutex).unwrap();
    assert_eq!(info.owner, None);
    assert_eq!(info.nesting, 0);
    assert!(info.waiters.is_empty());
}

#[test]
fn priority_discipline_serves_higher_first() {
    let kernel = kernel();
    let attributes = MutexAttributes::default().with_discipline(Discipline::Priority);
    let mutex = kernel.create_mutex(attributes).unwrap();
    let owner = thread(&kernel, 50);
    let low = thread(&kernel, 10);
    let high = thread(&kernel, 40);
    let high_too = thread(&kernel, 40);

    kernel.acquire(mutex, owner, None).unwrap();
    kernel.acquire(mutex, low, None).unwrap();
    kernel.acquire(mutex, high, None).unwrap();
    kernel.acquire(mutex, high_too, None).unwrap();

    assert_eq!(kernel.release(mutex, owner), Ok(Surrender::HandedOff(high)));
    assert_eq!(kernel.release(mutex, high), Ok(Surrender::HandedOff(high_too)));
    assert_eq!(kernel.release(mutex, high_too), Ok(Surrender::HandedOff(low)));
}

#[test]
fn inheritance_boosts_owner_until_release() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::inherit()).unwrap();
    let low = thread(&kernel, 10);
    let high = thread(&kernel, 90);

    kernel.acquire(mutex, low, None).unwrap();
    assert_eq!(effective(&kernel, low), 10);

    assert_eq!(kernel.acquire(mutex, high, None), Ok(Seize::Blocked));
    assert_eq!(effective(&kernel, low), 90);
    assert!(kernel
        .scheduler()
        .take()
        .contains(&Event::Priority(low, Priority::new(90))));

    assert_eq!(kernel.release(mutex, low), Ok(Surrender::HandedOff(high)));
    assert_eq!(effective(&kernel, low), 10);
    assert_eq!(effective(&kernel, high), 90);
    assert_eq!(kernel.mutex_info(mutex).unwrap().owner, Some(high));
}

#[test]
fn bounded_acquire_times_out() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let owner = thread(&kernel, 10);
    let waiter = thread(&kernel, 20);

    kernel.acquire(mutex, owner, None).unwrap();
    assert_eq!(
        kernel.acquire(mutex, waiter, Some(Duration::from_millis(100))),
        Ok(Seize::Blocked)
    );
    assert_eq!(
        kernel.thread_info(waiter).unwrap().state(),
        ThreadState::BlockedWithTimeout
    );

    for _ in 0..99 {
        assert_eq!(kernel.tick(), 0);
    }
    assert_eq!(kernel.wait_result(waiter), Err(SyncError::Pending));

    assert_eq!(kernel.tick(), 1);
    assert_eq!(kernel.wait_result(waiter), Err(SyncError::TimedOut));
    let info = kernel.mutex_info(mutex).unwrap();
    assert!(!info.waiters.contains(&waiter));
    assert_eq!(info.owner, Some(owner));

    // the owner is unaffected and nobody inherits the mutex
    assert_eq!(kernel.release(mutex, owner), Ok(Surrender::Released));
}

#[test]
fn forbidden_recursion_reports_self_deadlock() {
    let kernel = kernel();
    let attributes = MutexAttributes::default().with_recursion(Recursion::Forbidden);
    let mutex = kernel.create_mutex(attributes).unwrap();
    let t = thread(&kernel, 10);

    kernel.acquire(mutex, t, None).unwrap();
    assert_eq!(kernel.acquire(mutex, t, None), Err(SyncError::SelfDeadlock));
    assert_eq!(kernel.mutex_info(mutex).unwrap().nesting, 1);
    assert_eq!(kernel.release(mutex, t), Ok(Surrender::Released));
}

#[test]
fn allowed_recursion_nests() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let t = thread(&kernel, 10);
    let other = thread(&kernel, 10);

    kernel.acquire(mutex, t, None).unwrap();
    assert_eq!(kernel.acquire(mutex, t, None), Ok(Seize::Nested(2)));
    kernel.acquire(mutex, other, None).unwrap();

    assert_eq!(kernel.release(mutex, t), Ok(Surrender::Nested(1)));
    assert_eq!(kernel.wait_result(other), Err(SyncError::Pending));
    assert_eq!(kernel.release(mutex, t), Ok(Surrender::HandedOff(other)));
}

#[test]
fn release_by_non_owner_is_rejected() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let owner = thread(&kernel, 10);
    let intruder = thread(&kernel, 10);

    assert_eq!(kernel.release(mutex, owner), Err(SyncError::NotOwner));
    kernel.acquire(mutex, owner, None).unwrap();
    assert_eq!(kernel.release(mutex, intruder), Err(SyncError::NotOwner));
    assert_eq!(kernel.mutex_info(mutex).unwrap().owner, Some(owner));
}

#[test]
fn non_blocking_acquire() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let owner = thread(&kernel, 10);
    let other = thread(&kernel, 10);

    assert_eq!(kernel.try_acquire(mutex, owner), Ok(Seize::Acquired));
    assert_eq!(kernel.try_acquire(mutex, other), Err(SyncError::Unavailable));
    assert_eq!(
        kernel.acquire(mutex, other, Some(Duration::ZERO)),
        Err(SyncError::Unavailable)
    );
    assert_eq!(kernel.thread_info(other).unwrap().state(), ThreadState::Ready);
    assert!(kernel.mutex_info(mutex).unwrap().waiters.is_empty());
}

#[test]
fn ceiling_raises_owner_and_rejects_violators() {
    let kernel = kernel();
    let mutex = kernel
        .create_mutex(MutexAttributes::ceiling(Priority::new(60)))
        .unwrap();
    let t = thread(&kernel, 20);
    let urgent = thread(&kernel, 80);

    assert_eq!(kernel.acquire(mutex, urgent, None), Err(SyncError::CeilingViolated));
    assert_eq!(kernel.mutex_info(mutex).unwrap().owner, None);

    kernel.acquire(mutex, t, None).unwrap();
    assert_eq!(effective(&kernel, t), 60);
    kernel.release(mutex, t).unwrap();
    assert_eq!(effective(&kernel, t), 20);
}

#[test]
fn ceiling_applies_to_heir() {
    let kernel = kernel();
    let mutex = kernel
        .create_mutex(MutexAttributes::ceiling(Priority::new(60)))
        .unwrap();
    let first = thread(&kernel, 20);
    let second = thread(&kernel, 30);

    kernel.acquire(mutex, first, None).unwrap();
    kernel.acquire(mutex, second, None).unwrap();
    assert_eq!(kernel.release(mutex, first), Ok(Surrender::HandedOff(second)));
    assert_eq!(effective(&kernel, second), 60);
    assert_eq!(effective(&kernel, first), 20);
}

#[test]
fn invalid_protocol_and_stale_handles() {
    let kernel = kernel();
    let attributes = MutexAttributes::default().with_discipline(Discipline::Fifo);
    assert_eq!(
        kernel.create_mutex(MutexAttributes {
            protocol: Protocol::Inherit,
            ..attributes
        }),
        Err(SyncError::InvalidAttributes)
    );

    let mutex = kernel.create_mutex(attributes).unwrap();
    let t = thread(&kernel, 10);
    kernel.destroy_mutex(mutex).unwrap();
    assert_eq!(kernel.acquire(mutex, t, None), Err(SyncError::InvalidMutex));

    kernel.delete_thread(t).unwrap();
    let fresh = kernel.create_mutex(attributes).unwrap();
    assert_eq!(kernel.acquire(fresh, t, None), Err(SyncError::InvalidThread));
}

#[test]
fn blocked_thread_cannot_acquire_again() {
    let kernel = kernel();
    let a = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let b = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let owner = thread(&kernel, 10);
    let waiter = thread(&kernel, 10);

    kernel.acquire(a, owner, None).unwrap();
    kernel.acquire(a, waiter, None).unwrap();
    assert_eq!(kernel.acquire(b, waiter, None), Err(SyncError::InvalidState));
}
