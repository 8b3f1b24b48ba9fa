//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, light an annunciator,
//! queue them for a later upload.

use crate::fsm::StateId;
use crate::fsm::context::Outputs;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The controller moved between states.
    StateChanged { from: StateId, to: StateId },

    /// The estimator emitted a fresh rate sample (milli-psi/s).
    RateSample(i32),

    /// Slow decay counted long enough to call it a leak.
    LeakConfirmed { samples: u32 },

    /// The valve was open (or faulted open) past the mode limit.
    OpenDwellExceeded { open_ms: u32 },

    /// Supply pressure fell below the source minimum.
    WaterSourceFault,

    /// The user acknowledged an alarm.
    AlarmMuted,

    /// Timers and alarms were cleared.
    Reset,

    /// Per-poll output record.
    Poll(Outputs),
}

impl AppEvent {
    /// Events implied by a transition, in the order they should be reported.
    pub fn for_transition(from: StateId, to: StateId, timer_1: u32, timer_2: u32) -> Option<Self> {
        match (from, to) {
            (StateId::ClosedCounting, StateId::ClosedAlarmed) => {
                Some(Self::LeakConfirmed { samples: timer_1 })
            }
            (StateId::OpenCounting | StateId::WaterSourceFault, StateId::ClosedAlarmed) => {
                Some(Self::OpenDwellExceeded { open_ms: timer_2 })
            }
            (_, StateId::WaterSourceFault) => Some(Self::WaterSourceFault),
            (_, StateId::ClosedMuted) => Some(Self::AlarmMuted),
            (_, StateId::ClosedReset) => Some(Self::Reset),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alarm_cause_follows_origin_state() {
        assert_eq!(
            AppEvent::for_transition(StateId::ClosedCounting, StateId::ClosedAlarmed, 10, 0),
            Some(AppEvent::LeakConfirmed { samples: 10 })
        );
        assert_eq!(
            AppEvent::for_transition(StateId::OpenCounting, StateId::ClosedAlarmed, 0, 30_001),
            Some(AppEvent::OpenDwellExceeded { open_ms: 30_001 })
        );
    }

    #[test]
    fn ordinary_transitions_have_no_extra_event() {
        assert_eq!(
            AppEvent::for_transition(StateId::ClosedIdle, StateId::OpenCounting, 0, 0),
            None
        );
    }
}
