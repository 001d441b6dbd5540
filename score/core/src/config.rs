//! Kernel configuration
//!
//! Table sizes are fixed at compile time by [`MAX_THREADS`] and
//! [`MAX_MUTEXES`]; a [`KernelConfig`] may only shrink them.

use core::time::Duration;

use crate::ids::NodeId;

/// Storage capacity of the thread table.
pub const MAX_THREADS: usize = 64;

/// Storage capacity of the mutex table.
pub const MAX_MUTEXES: usize = 64;

/// Runtime configuration of a kernel instance.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    pub name: &'static str,
    pub max_threads: usize,
    pub max_mutexes: usize,
    pub tick_period: Duration,
    pub local_node: NodeId,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            name: "score",
            max_threads: MAX_THREADS,
            max_mutexes: MAX_MUTEXES,
            tick_period: Duration::from_millis(1),
            local_node: NodeId::LOCAL,
        }
    }
}

impl KernelConfig {
    /// Creates a new kernel configuration builder.
    pub fn builder() -> KernelConfigBuilder {
        KernelConfigBuilder::default()
    }
}

/// Builder for ergonomic kernel configuration construction.
#[derive(Debug, Clone, Default)]
pub struct KernelConfigBuilder {
    config: KernelConfig,
}

impl KernelConfigBuilder {
    /// Sets the kernel name.
    pub fn name(mut self, name: &'static str) -> Self {
        self.config.name = name;
        self
    }

    /// Sets the maximum number of threads (at most [`MAX_THREADS`]).
    pub fn max_threads(mut self, max: usize) -> Self {
        self.config.max_threads = max;
        self
    }

    /// Sets the maximum number of mutexes (at most [`MAX_MUTEXES`]).
    pub fn max_mutexes(mut self, max: usize) -> Self {
        self.config.max_mutexes = max;
        self
    }

    /// Sets the period of one watchdog tick.
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.config.tick_period = period;
        self
    }

    /// Sets the node this kernel runs on.
    pub fn local_node(mut self, node: NodeId) -> Self {
        self.config.local_node = node;
        self
    }

    /// Builds the final configuration.
    ///
    /// Table sizes above the compile-time capacities are clamped, and a zero
    /// tick period is raised to one nanosecond.
    pub fn build(mut self) -> KernelConfig {
        if self.config.max_threads > MAX_THREADS {
            log::warn!(
                "{}: max_threads {} clamped to {}",
                self.config.name,
                self.config.max_threads,
                MAX_THREADS
            );
            self.config.max_threads = MAX_THREADS;
        }
        if self.config.max_mutexes > MAX_MUTEXES {
            log::warn!(
                "{}: max_mutexes {} clamped to {}",
                self.config.name,
                self.config.max_mutexes,
                MAX_MUTEXES
            );
            self.config.max_mutexes = MAX_MUTEXES;
        }
        if self.config.tick_period.is_zero() {
            self.config.tick_period = Duration::from_nanos(1);
        }
        self.config
    }
}
