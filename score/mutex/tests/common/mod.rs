//! Helpers shared by the mutex integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Mutex;

use score_core::{Priority, ThreadId};
use score_mutex::Kernel;
use score_threadq::{LocalExtract, Scheduler, ThreadAttributes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Blocked(ThreadId),
    Ready(ThreadId, Priority),
    Priority(ThreadId, Priority),
}

/// Scheduler that records every notification.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn readied(&self) -> Vec<ThreadId> {
        self.take()
            .into_iter()
            .filter_map(|event| match event {
                Event::Ready(thread, _) => Some(thread),
                _ => None,
            })
            .collect()
    }
}

impl Scheduler for Recorder {
    fn thread_blocked(&self, thread: ThreadId) {
        self.events.lock().unwrap().push(Event::Blocked(thread));
    }

    fn thread_ready(&self, thread: ThreadId, priority: Priority) {
        self.events.lock().unwrap().push(Event::Ready(thread, priority));
    }

    fn priority_changed(&self, thread: ThreadId, priority: Priority) {
        self.events.lock().unwrap().push(Event::Priority(thread, priority));
    }
}

pub type TestKernel = Kernel<Recorder, LocalExtract>;

pub fn kernel() -> TestKernel {
    Kernel::builder().scheduler(Recorder::default()).build()
}

pub fn thread(kernel: &TestKernel, priority: u8) -> ThreadId {
    kernel
        .create_thread(ThreadAttributes::new(Priority::new(priority)))
        .unwrap()
}

pub fn effective(kernel: &TestKernel, thread: ThreadId) -> u8 {
    kernel.thread_info(thread).unwrap().current_priority().raw()
}

/// Remote callout that records its calls.
#[derive(Default)]
pub struct RemoteLog {
    pub calls: RefCell<Vec<(ThreadId, score_core::NodeId, score_core::WaitStatus)>>,
}

impl score_threadq::RemoteExtract for RemoteLog {
    fn extract(&self, thread: ThreadId, node: score_core::NodeId, status: score_core::WaitStatus) {
        self.calls.borrow_mut().push((thread, node, status));
    }
}
