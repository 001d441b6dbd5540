//! Per-wait watchdog timer
//!
//! Every thread owns one watchdog. It is armed when a bounded wait begins,
//! counted down by the kernel tick, and disarmed by whichever wake-up ends
//! the wait first.

use score_core::Ticks;

#[derive(Debug, Clone, Default)]
pub struct Watchdog {
    remaining: Option<Ticks>,
}

impl Watchdog {
    pub const fn new() -> Self {
        Self { remaining: None }
    }

    /// Arm the timer. A zero interval is treated as one tick.
    pub fn arm(&mut self, interval: Ticks) {
        self.remaining = Some(Ticks::new(interval.ticks().max(1)));
    }

    /// Disarm the timer. Returns true if it was armed.
    pub fn disarm(&mut self) -> bool {
        self.remaining.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<Ticks> {
        self.remaining
    }

    /// Count one tick. Returns true when the timer fires on this tick.
    ///
    /// A fired timer stays armed (at zero) until the wake-up disarms it.
    pub fn tick(&mut self) -> bool {
        match self.remaining.as_mut() {
            Some(ticks) => ticks.decrement(),
            None => false,
        }
    }
}
