//! Kernel tick thread
//!
//! Drives [`Kernel::tick`] at the configured tick period from a dedicated
//! OS thread. Sleeps until absolute deadlines so the tick rate does not
//! drift with the time spent inside the kernel. Ticks are never closer
//! together than one period, so a timed wait never ends early by more than
//! the tick in progress when it started.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use score_mutex::Kernel;
use score_threadq::{RemoteExtract, Scheduler};

/// Running tick thread. Stopped and joined on drop.
pub struct Ticker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start<S, R>(kernel: Arc<Kernel<S, R>>) -> Self
    where
        S: Scheduler + Send + Sync + 'static,
        R: RemoteExtract + Send + Sync + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let period = kernel.config().tick_period;
        log::debug!("ticker started: period {period:?}");

        let handle = thread::Builder::new()
            .name("score-tick".into())
            .spawn(move || {
                let mut next_tick = Instant::now();
                while flag.load(Ordering::Relaxed) {
                    next_tick += period;
                    let now = Instant::now();
                    if next_tick > now {
                        thread::sleep(next_tick - now);
                    } else {
                        // late: skip the missed ticks instead of bursting
                        next_tick = now;
                    }
                    let expired = kernel.tick();
                    if expired > 0 {
                        log::trace!("{expired} wait(s) timed out");
                    }
                }
            })
            .ok();
        if handle.is_none() {
            log::warn!("could not spawn the tick thread; timed waits will not expire");
        }

        Self { running, handle }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::Relaxed)
    }

    /// Stop ticking and wait for the thread to finish.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
