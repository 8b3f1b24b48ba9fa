//! Pressure rate-of-change estimator.
//!
//! Converts a stream of `(delta_t, P)` samples into an intermittent rate
//! in milli-psi per second.  Two triggers:
//!
//! - **Fast drop**: the reading fell more than `fast_drop_mpsi` below the
//!   window reference.  Emit immediately, so a burst pipe is seen within
//!   one poll instead of one window.
//! - **Windowed**: pressure rose above the reference and at least one
//!   full window has accumulated.
//!
//! Either way the reference pressure and the time window restart together
//! at the emission instant.  A reference of `0` means "no reference yet";
//! the first call after [`clear`](PressureRateEstimator::clear) only
//! records the reading.

use crate::accumulator::TimeAccumulator;

/// Turns pressure samples into rate samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressureRateEstimator {
    window: TimeAccumulator,
    last_p: i32,
    fast_drop_mpsi: i32,
}

impl PressureRateEstimator {
    /// Sentinel reference meaning "not yet seeded".
    const NO_REFERENCE: i32 = 0;

    pub fn new(window_ms: u32, fast_drop_mpsi: i32) -> Self {
        Self {
            window: TimeAccumulator::new(window_ms),
            last_p: Self::NO_REFERENCE,
            fast_drop_mpsi,
        }
    }

    /// Feed one poll.  Returns a rate sample when one is emitted.
    pub fn update(&mut self, elapsed: u32, p: i32) -> Option<i32> {
        self.window.update(elapsed);

        if self.last_p == Self::NO_REFERENCE {
            self.last_p = p;
            return None;
        }

        let drop = self.last_p.saturating_sub(p);
        let fast = drop > self.fast_drop_mpsi;
        let windowed = drop < 0 && self.window.overflows() > 0;

        // A zero-length window can only happen on a fast drop reported in
        // the same instant as the reference; wait for time to pass.
        if (fast || windowed) && self.window.count() > 0 {
            Some(self.emit(p))
        } else {
            None
        }
    }

    /// Forget the reference pressure and the accumulated window.
    pub fn clear(&mut self) {
        self.window.reset();
        self.last_p = Self::NO_REFERENCE;
    }

    /// Reference pressure of the current window, if seeded.
    pub fn reference(&self) -> Option<i32> {
        (self.last_p != Self::NO_REFERENCE).then_some(self.last_p)
    }

    /// Milliseconds accumulated in the current window.
    pub fn window_elapsed(&self) -> u32 {
        self.window.count()
    }

    fn emit(&mut self, p: i32) -> i32 {
        let delta = i64::from(p) - i64::from(self.last_p);
        let rate = (1000 * delta / i64::from(self.window.count()))
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        self.last_p = p;
        self.window.reset();
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> PressureRateEstimator {
        PressureRateEstimator::new(5000, 4000)
    }

    #[test]
    fn first_sample_only_seeds_reference() {
        let mut est = estimator();
        assert_eq!(est.update(1000, 60_000), None);
        assert_eq!(est.reference(), Some(60_000));
    }

    #[test]
    fn fast_drop_emits_on_the_same_poll() {
        let mut est = estimator();
        est.update(1000, 60_000);
        // 4001 milli-psi drop after 1000 ms more: window holds 2000 ms
        let rate = est.update(1000, 55_999);
        assert_eq!(rate, Some(1000 * (55_999 - 60_000) / 2000));
        assert_eq!(est.reference(), Some(55_999));
        assert_eq!(est.window_elapsed(), 0);
    }

    #[test]
    fn drop_at_threshold_does_not_emit() {
        let mut est = estimator();
        est.update(1000, 60_000);
        assert_eq!(est.update(100, 56_000), None);
        assert_eq!(est.reference(), Some(60_000));
    }

    #[test]
    fn windowed_emission_needs_rise_and_full_window() {
        let mut est = estimator();
        est.update(0, 50_000);
        assert_eq!(est.update(2000, 51_000), None);
        assert_eq!(est.update(2000, 51_000), None);
        assert_eq!(est.update(1000, 51_000), Some(200));
        assert_eq!(est.reference(), Some(51_000));
    }

    #[test]
    fn steady_pressure_never_emits() {
        let mut est = estimator();
        est.update(0, 50_000);
        for _ in 0..100 {
            assert_eq!(est.update(1000, 50_000), None);
        }
        assert_eq!(est.window_elapsed(), 100_000);
    }

    #[test]
    fn slow_decay_emits_once_drop_exceeds_threshold() {
        let mut est = estimator();
        est.update(0, 60_000);
        // -500 milli-psi per second: crosses 4000 after 9 s
        let mut emitted = None;
        for step in 1..=9 {
            emitted = est.update(1000, 60_000 - 500 * step);
            if step < 9 {
                assert_eq!(emitted, None);
            }
        }
        assert_eq!(emitted, Some(-500));
    }

    #[test]
    fn clear_restores_sentinel() {
        let mut est = estimator();
        est.update(1000, 60_000);
        est.update(1000, 61_000);
        est.clear();
        assert_eq!(est.reference(), None);
        assert_eq!(est.window_elapsed(), 0);
        assert_eq!(est.update(10_000, 40_000), None);
    }

    #[test]
    fn zero_time_fast_drop_waits() {
        let mut est = estimator();
        est.update(0, 60_000);
        assert_eq!(est.update(0, 50_000), None);
        assert_eq!(est.update(500, 50_000), Some(-20_000));
    }
}
