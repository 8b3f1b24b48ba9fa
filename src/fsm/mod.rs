//! Valve controller finite state machine.
//!
//! Seven states, exactly one active at a time:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────┐
//! │ StateId          │ Meaning                                      │
//! ├──────────────────┼──────────────────────────────────────────────┤
//! │ ClosedReset      │ transient: clear timers and alarms           │
//! │ ClosedIdle       │ valve closed, nothing suspected              │
//! │ ClosedCounting   │ valve closed, slow decay being counted       │
//! │ OpenCounting     │ valve open, exposure time bounded            │
//! │ WaterSourceFault │ supply pressure too low                      │
//! │ ClosedAlarmed    │ leak or overrun confirmed                    │
//! │ ClosedMuted      │ alarm acknowledged, audio off                │
//! └──────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Each poll [`ValveController::run`] matches on the current [`StateId`],
//! calls that state's handler in [`states`], and applies the transition it
//! returns.  Handlers build the full [`Outputs`] record every poll.
//!
//! The controller exclusively owns its rate estimator and watchdog
//! accumulator.  Two valves means two controllers; nothing is shared.

pub mod context;
pub mod states;

use context::{AlarmFlags, Inputs, Outputs, Status};
use log::{debug, info};

use crate::accumulator::TimeAccumulator;
use crate::config::FloodConfig;
use crate::error::Result;
use crate::sensors::PressureRateEstimator;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    ClosedReset = 0,
    ClosedIdle = 1,
    ClosedCounting = 2,
    OpenCounting = 3,
    WaterSourceFault = 4,
    ClosedAlarmed = 5,
    ClosedMuted = 6,
}

impl StateId {
    pub const COUNT: usize = 7;

    pub const ALL: [StateId; StateId::COUNT] = [
        Self::ClosedReset,
        Self::ClosedIdle,
        Self::ClosedCounting,
        Self::OpenCounting,
        Self::WaterSourceFault,
        Self::ClosedAlarmed,
        Self::ClosedMuted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ClosedReset => "closed_reset",
            Self::ClosedIdle => "closed_idle",
            Self::ClosedCounting => "closed_counting",
            Self::OpenCounting => "open_counting",
            Self::WaterSourceFault => "water_source_fault",
            Self::ClosedAlarmed => "closed_alarmed",
            Self::ClosedMuted => "closed_muted",
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The valve controller.  Create once at device start; call
/// [`run`](Self::run) once per poll for the life of the process.
#[derive(Debug, Clone)]
pub struct ValveController {
    config: FloodConfig,
    state: StateId,
    /// Leak dwell, in rate samples.
    timer_1: u32,
    /// Continuous open time, in milliseconds.
    timer_2: u32,
    estimator: PressureRateEstimator,
    /// Forces `timer_1` back to zero when counting goes quiet.
    count_reset: TimeAccumulator,
    /// Visual alarms kept lit through `ClosedAlarmed` and `ClosedMuted`.
    latched: AlarmFlags,
    /// Last emitted rate sample.
    delta_p: i32,
    /// Set when the estimator emitted during the current poll.
    fresh: bool,
    polls: u64,
    state_entry_poll: u64,
}

impl ValveController {
    /// Build a controller from a validated threshold table.
    pub fn new(config: FloodConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: FloodConfig) -> Self {
        Self {
            estimator: PressureRateEstimator::new(config.rate_window_ms, config.fast_drop_mpsi),
            count_reset: TimeAccumulator::new(config.count_reset_window_ms),
            config,
            state: StateId::ClosedIdle,
            timer_1: 0,
            timer_2: 0,
            latched: AlarmFlags::default(),
            delta_p: 0,
            fresh: false,
            polls: 0,
            state_entry_poll: 0,
        }
    }

    /// Process one poll.
    pub fn run(&mut self, input: &Inputs) -> Outputs {
        self.polls += 1;
        self.fresh = false;

        let (out, next) = match self.state {
            StateId::ClosedReset => states::closed_reset(self, input),
            StateId::ClosedIdle => states::closed_idle(self, input),
            StateId::ClosedCounting => states::closed_counting(self, input),
            StateId::OpenCounting => states::open_counting(self, input),
            StateId::WaterSourceFault => states::water_source_fault(self, input),
            StateId::ClosedAlarmed => states::closed_alarmed(self, input),
            StateId::ClosedMuted => states::closed_muted(self, input),
        };

        if let Some(next) = next {
            self.transition(next);
        }
        out
    }

    /// Jump straight to `next` (commissioning and tests).
    pub fn force_transition(&mut self, next: StateId) {
        if next != self.state {
            self.transition(next);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn state(&self) -> StateId {
        self.state
    }

    /// Leak dwell so far, in rate samples.
    pub fn timer_1(&self) -> u32 {
        self.timer_1
    }

    /// Continuous open time so far, in milliseconds.
    pub fn timer_2(&self) -> u32 {
        self.timer_2
    }

    /// Last emitted rate sample (milli-psi/s).
    pub fn delta_p(&self) -> i32 {
        self.delta_p
    }

    pub fn config(&self) -> &FloodConfig {
        &self.config
    }

    /// Polls processed since the current state was entered.
    pub fn polls_in_state(&self) -> u64 {
        self.polls - self.state_entry_poll
    }

    // -----------------------------------------------------------------------
    // Helpers shared by the state handlers
    // -----------------------------------------------------------------------

    /// Advance the rate estimator.  Every state calls this exactly once.
    fn sample(&mut self, input: &Inputs) -> Option<i32> {
        let rate = self.estimator.update(input.delta_t, input.pressure)?;
        self.delta_p = rate;
        self.fresh = true;
        Some(rate)
    }

    /// Leak dwell watchdog: a full window without counting activity
    /// forgets any partial count.
    fn service_count_reset(&mut self, delta_t: u32) {
        self.count_reset.update(delta_t);
        if self.count_reset.overflows() > 0 {
            self.count_reset.reset();
            if self.timer_1 != 0 {
                debug!("watchdog: dropping stale leak dwell {}", self.timer_1);
            }
            self.timer_1 = 0;
        }
    }

    /// Baseline outputs: valve closed, alarms off, current rate.
    fn outputs(&self, status: Status) -> Outputs {
        let mut out = Outputs::quiet(status, self.delta_p);
        out.delta_p_fresh = self.fresh;
        out
    }

    fn transition(&mut self, next: StateId) {
        info!("FSM transition: {} -> {}", self.state.name(), next.name());
        self.state = next;
        self.state_entry_poll = self.polls;
    }
}

impl Default for ValveController {
    fn default() -> Self {
        Self::build(FloodConfig::default())
    }
}


#[cfg(test)]
mod proptests {
    use super::context::Inputs;
    use super::*;
    use proptest::prelude::*;

    fn arb_poll() -> impl Strategy<Value = Inputs> {
        (
            20_000i32..80_000, // pressure
            0u32..20_000,      // delta_t
            proptest::bool::weighted(0.05),
            any::<bool>(),
        )
            .prop_map(|(p, dt, reset, away)| Inputs {
                pressure: p,
                delta_t: dt,
                reset_button: reset,
                away_switch_on: away,
            })
    }

    proptest! {
        #[test]
        fn outputs_match_state_contract(polls in proptest::collection::vec(arb_poll(), 1..200)) {
            let mut ctl = ValveController::default();
            for input in polls {
                let before = ctl.state();
                let out = ctl.run(&input);
                match before {
                    StateId::ClosedIdle | StateId::ClosedCounting => {
                        prop_assert!(!out.valve_open);
                        prop_assert!(!out.alarm_audio_on);
                    }
                    StateId::OpenCounting => prop_assert!(out.valve_open),
                    StateId::ClosedAlarmed => {
                        prop_assert!(!out.valve_open);
                        prop_assert!(out.leak_alarm_on && out.alarm_audio_on);
                    }
                    StateId::ClosedMuted => {
                        prop_assert!(!out.valve_open);
                        prop_assert!(!out.alarm_audio_on);
                    }
                    StateId::ClosedReset => {
                        prop_assert!(!out.alarm_audio_on && !out.leak_alarm_on);
                        prop_assert_eq!(ctl.state(), StateId::ClosedIdle);
                    }
                    StateId::WaterSourceFault => {}
                }
            }
        }

        #[test]
        fn leak_dwell_never_exceeds_emitted_samples(polls in proptest::collection::vec(arb_poll(), 1..200)) {
            let mut ctl = ValveController::default();
            for input in polls {
                let before = ctl.timer_1();
                let out = ctl.run(&input);
                let after = ctl.timer_1();
                if out.delta_p_fresh {
                    prop_assert!(after <= before + 1);
                } else {
                    prop_assert!(after <= before);
                }
            }
        }
    }
}
