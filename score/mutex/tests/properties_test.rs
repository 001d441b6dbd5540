//! Randomised interleavings checked against the kernel invariants.

mod common;

use std::collections::HashMap;
use std::time::Duration;

use common::{kernel, thread, TestKernel};
use score_core::{MutexId, Priority, SyncError, ThreadId, WaitStatus};
use score_mutex::{MutexAttributes, Protocol, Seize, Surrender};
use score_threadq::Discipline;

/// Check every invariant that must hold between two operations.
fn check_invariants(kernel: &TestKernel, threads: &[ThreadId], mutexes: &[MutexId]) {
    let mut queued_in = HashMap::new();
    let mut owed: HashMap<ThreadId, Priority> = HashMap::new();

    for &mutex in mutexes {
        let info = kernel.mutex_info(mutex).unwrap();
        assert_eq!(info.owner.is_none(), info.nesting == 0, "{mutex} owner/nesting");

        for &waiter in &info.waiters {
            assert!(queued_in.insert(waiter, mutex).is_none(), "{waiter} queued twice");
            let tcb = kernel.thread_info(waiter).unwrap();
            assert!(tcb.is_blocked());
            assert_eq!(tcb.wait_object(), Some(mutex));
            assert_ne!(info.owner, Some(waiter));
        }

        let Some(owner) = info.owner else {
            assert!(info.waiters.is_empty(), "{mutex} has waiters but no owner");
            continue;
        };
        let obligation = match info.attributes.protocol {
            Protocol::Plain => None,
            Protocol::Ceiling(ceiling) => Some(ceiling),
            Protocol::Inherit => info
                .waiters
                .iter()
                .map(|&waiter| kernel.thread_info(waiter).unwrap().current_priority())
                .max(),
        };
        if let Some(priority) = obligation {
            let entry = owed.entry(owner).or_default();
            *entry = (*entry).max(priority);
        }
    }

    for &thread in threads {
        let tcb = kernel.thread_info(thread).unwrap();
        let expected = owed
            .get(&thread)
            .copied()
            .unwrap_or_default()
            .max(tcb.base_priority());
        assert_eq!(tcb.current_priority(), expected, "{thread} effective priority");
        if tcb.is_blocked() {
            assert!(queued_in.contains_key(&thread), "{thread} blocked outside any queue");
        } else {
            assert!(tcb.wait_object().is_none());
        }
    }
}

#[test]
fn random_interleavings_preserve_invariants() {
    for seed in 0..24 {
        fastrand::seed(seed);
        run_interleaving(seed);
    }
}

fn run_interleaving(seed: u64) {
    let kernel = kernel();
    let threads: Vec<_> = (0..8).map(|_| thread(&kernel, fastrand::u8(1..=150))).collect();
    let mutexes = vec![
        kernel.create_mutex(MutexAttributes::default()).unwrap(),
        kernel
            .create_mutex(MutexAttributes::default().with_discipline(Discipline::Priority))
            .unwrap(),
        kernel.create_mutex(MutexAttributes::inherit()).unwrap(),
        kernel.create_mutex(MutexAttributes::inherit()).unwrap(),
        kernel
            .create_mutex(MutexAttributes::ceiling(Priority::new(200)))
            .unwrap(),
    ];
    let mut waiting: HashMap<ThreadId, MutexId> = HashMap::new();

    for step in 0..400 {
        let thread = threads[fastrand::usize(..threads.len())];
        let mutex = mutexes[fastrand::usize(..mutexes.len())];
        let blocked = kernel.thread_info(thread).unwrap().is_blocked();

        match fastrand::u8(..10) {
            _ if blocked => {
                kernel.tick();
            }
            0..=4 => {
                let timeout = match fastrand::u8(..3) {
                    0 => None,
                    1 => Some(Duration::ZERO),
                    _ => Some(Duration::from_millis(fastrand::u64(1..20))),
                };
                match kernel.acquire(mutex, thread, timeout) {
                    Ok(Seize::Blocked) => {
                        waiting.insert(thread, mutex);
                    }
                    Ok(Seize::Acquired) | Ok(Seize::Nested(_)) => {
                        assert_eq!(kernel.mutex_info(mutex).unwrap().owner, Some(thread));
                    }
                    Err(SyncError::Unavailable) => assert_eq!(timeout, Some(Duration::ZERO)),
                    Err(error) => panic!("seed {seed} step {step}: unexpected {error}"),
                }
            }
            5..=8 => match kernel.release(mutex, thread) {
                Ok(Surrender::HandedOff(heir)) => {
                    assert_eq!(waiting.remove(&heir), Some(mutex));
                    assert_eq!(kernel.wait_result(heir), Ok(()));
                }
                Ok(_) => {}
                Err(SyncError::NotOwner) => {
                    assert_ne!(kernel.mutex_info(mutex).unwrap().owner, Some(thread));
                }
                Err(error) => panic!("seed {seed} step {step}: unexpected {error}"),
            },
            _ => {
                kernel.tick();
            }
        }

        // every wait that ended since the last step ended exactly one way
        waiting.retain(|&waiter, &mut object| {
            let tcb = kernel.thread_info(waiter).unwrap();
            if tcb.is_blocked() {
                return true;
            }
            let owner = kernel.mutex_info(object).unwrap().owner;
            match tcb.wait_status() {
                Some(WaitStatus::Granted) => assert_eq!(owner, Some(waiter)),
                Some(WaitStatus::TimedOut) => {
                    assert_ne!(owner, Some(waiter));
                    assert_eq!(kernel.wait_result(waiter), Err(SyncError::TimedOut));
                }
                other => panic!("seed {seed} step {step}: {waiter} woke with {other:?}"),
            }
            false
        });

        check_invariants(&kernel, &threads, &mutexes);
    }
}

#[test]
fn timed_out_waiter_is_never_granted() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let owner = thread(&kernel, 10);
    let waiter = thread(&kernel, 10);

    kernel.acquire(mutex, owner, None).unwrap();
    kernel
        .acquire(mutex, waiter, Some(Duration::from_millis(1)))
        .unwrap();
    assert_eq!(kernel.tick(), 1);
    assert_eq!(kernel.release(mutex, owner), Ok(Surrender::Released));
    assert_eq!(kernel.wait_result(waiter), Err(SyncError::TimedOut));
    assert_eq!(kernel.mutex_info(mutex).unwrap().owner, None);
}

#[test]
fn granted_waiter_never_times_out() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let owner = thread(&kernel, 10);
    let waiter = thread(&kernel, 10);

    kernel.acquire(mutex, owner, None).unwrap();
    kernel
        .acquire(mutex, waiter, Some(Duration::from_millis(2)))
        .unwrap();
    kernel.tick();
    assert_eq!(kernel.release(mutex, owner), Ok(Surrender::HandedOff(waiter)));

    for _ in 0..5 {
        assert_eq!(kernel.tick(), 0);
    }
    assert_eq!(kernel.wait_result(waiter), Ok(()));
    assert!(!kernel.thread_info(waiter).unwrap().watchdog().is_armed());
}

#[test]
fn fifo_fairness_over_repeated_releases() {
    let kernel = kernel();
    let mutex = kernel.create_mutex(MutexAttributes::default()).unwrap();
    let owner = thread(&kernel, 1);
    let order: Vec<_> = [5, 90, 30, 60].iter().map(|&p| thread(&kernel, p)).collect();

    kernel.acquire(mutex, owner, None).unwrap();
    for &t in &order {
        kernel.acquire(mutex, t, None).unwrap();
    }

    let mut holder = owner;
    for &expected in &order {
        assert_eq!(kernel.release(mutex, holder), Ok(Surrender::HandedOff(expected)));
        holder = expected;
    }
    assert_eq!(kernel.release(mutex, holder), Ok(Surrender::Released));
}
