//! Elapsed-time accumulator.
//!
//! The controller has no wall clock, only the variable `delta_t` between
//! polls.  [`TimeAccumulator`] integrates those intervals and reports how
//! many whole `timeout` periods have elapsed, so a threshold fires the
//! same way whether the device was polled every 10 ms or stalled for a
//! minute.

/// Integrates elapsed milliseconds against a fixed timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAccumulator {
    elapsed: u32,
    timeout: u32,
}

impl TimeAccumulator {
    /// `timeout` must be non-zero; [`FloodConfig::validate`](crate::config::FloodConfig::validate)
    /// guarantees this for every accumulator the controller builds.
    pub const fn new(timeout: u32) -> Self {
        Self {
            elapsed: 0,
            timeout,
        }
    }

    /// Add `elapsed` milliseconds.  Saturates instead of wrapping so a
    /// device left idle for weeks reads as "overflowed", never as zero.
    pub fn update(&mut self, elapsed: u32) {
        self.elapsed = self.elapsed.saturating_add(elapsed);
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }

    /// Consume the completed periods but carry the sub-timeout residue.
    pub fn reset_keep_remainder(&mut self) {
        self.elapsed %= self.timeout;
    }

    /// Milliseconds accumulated since the last reset.
    pub fn count(&self) -> u32 {
        self.elapsed
    }

    /// Number of whole timeout periods accumulated.
    pub fn overflows(&self) -> u32 {
        self.elapsed / self.timeout
    }
}
