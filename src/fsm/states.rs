//! State handler functions.
//!
//! One plain `fn` per state.  Each reads the poll, updates the controller's
//! timers, builds the complete [`Outputs`] for this poll and returns the
//! next state if it wants to leave.
//!
//! ```text
//!            ┌──[P < closed_min]────────────────────────┐
//!            │                                          ▼
//!  IDLE ──[rate in band]──▶ COUNTING ──[P < closed_min]──▶ OPEN
//!   ▲  ▲                     │   │                       │  │
//!   │  └─────[rate < use]────┘   │[dwell ≥ timeout]      │  └─[P < source_min]──▶ SOURCE FAULT
//!   │                            ▼                       │                          │
//!   │                         ALARMED ◀──[open too long]─┘◀────[open too long]──────┘
//!   │                            │                                                  │
//!   │                         [reset]                                            [reset]
//!   │                            ▼                                                  │
//!   └──── RESET ◀──[reset]──── MUTED ◀──────────────────────────────────────────────┘
//! ```
//!
//! OPEN returns to IDLE when pressure recovers; SOURCE FAULT returns to
//! IDLE when supply pressure returns; a quiescent rate in COUNTING goes
//! through RESET to start clean.

use log::{info, warn};

use super::context::{AlarmFlags, Inputs, Outputs, Status};
use super::{StateId, ValveController};

/// What a handler hands back to the dispatcher.
pub type Step = (Outputs, Option<StateId>);

// ═══════════════════════════════════════════════════════════════════════════
//  RESET: transient, clears timers and alarms
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn closed_reset(ctl: &mut ValveController, input: &Inputs) -> Step {
    ctl.sample(input);
    ctl.count_reset.reset();
    ctl.timer_1 = 0;
    ctl.timer_2 = 0;
    ctl.latched = AlarmFlags::default();

    (ctl.outputs(Status::Reset), Some(StateId::ClosedIdle))
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE: valve closed, watching the rate
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn closed_idle(ctl: &mut ValveController, input: &Inputs) -> Step {
    ctl.service_count_reset(input.delta_t);
    let rate = ctl.sample(input);
    let out = ctl.outputs(Status::Off);

    if let Some(rate) = rate.filter(|r| ctl.config.in_leak_band(*r)) {
        // The sample that raised suspicion is the first unit of dwell.
        ctl.timer_1 = ctl.timer_1.saturating_add(1);
        ctl.count_reset.reset();
        info!("IDLE: rate {rate} mpsi/s in leak band, counting");
        return (out, Some(StateId::ClosedCounting));
    }

    if input.pressure < ctl.config.p_closed_min {
        return (out, Some(StateId::OpenCounting));
    }

    (out, None)
}

// ═══════════════════════════════════════════════════════════════════════════
//  COUNTING: valve closed, slow decay accumulating toward a leak
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn closed_counting(ctl: &mut ValveController, input: &Inputs) -> Step {
    ctl.service_count_reset(input.delta_t);
    let rate = ctl.sample(input);
    let cfg = &ctl.config;

    let mut next = None;
    if input.pressure < cfg.p_closed_min {
        next = Some(StateId::OpenCounting);
    } else if let Some(rate) = rate {
        if rate < cfg.delta_p_use_min {
            info!("COUNTING: rate {rate} mpsi/s is water use, back to idle");
            next = Some(StateId::ClosedIdle);
        } else if rate > cfg.delta_p_quiescent_max {
            info!("COUNTING: rate {rate} mpsi/s is quiescent, resetting");
            next = Some(StateId::ClosedReset);
        } else {
            ctl.timer_1 = ctl.timer_1.saturating_add(1);
            ctl.count_reset.reset();
        }
    }

    if ctl.timer_1 >= ctl.config.leak_timeout_samples {
        warn!(
            "COUNTING: leak confirmed after {} samples, closing and alarming",
            ctl.timer_1
        );
        ctl.latched = AlarmFlags {
            leak: true,
            water_source: false,
        };
        next = Some(StateId::ClosedAlarmed);
    }

    (ctl.outputs(Status::Counting(ctl.timer_1)), next)
}

// ═══════════════════════════════════════════════════════════════════════════
//  OPEN: valve open, exposure time bounded by mode
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn open_counting(ctl: &mut ValveController, input: &Inputs) -> Step {
    ctl.service_count_reset(input.delta_t);
    ctl.timer_2 = ctl.timer_2.saturating_add(input.delta_t);
    ctl.sample(input);

    let mut out = ctl.outputs(Status::On);
    out.valve_open = true;

    let cfg = &ctl.config;
    let limit = cfg.open_limit_ms(input.away_switch_on);

    if input.pressure > cfg.p_open_max {
        ctl.timer_2 = 0;
        ctl.estimator.clear();
        return (out, Some(StateId::ClosedIdle));
    }

    if input.pressure < cfg.p_source_min {
        warn!("OPEN: supply pressure {} mpsi below minimum", input.pressure);
        ctl.timer_2 = 0;
        return (out, Some(StateId::WaterSourceFault));
    }

    if ctl.timer_2 > limit {
        warn!(
            "OPEN: valve open {} ms, over the {} ms limit (away={})",
            ctl.timer_2, limit, input.away_switch_on
        );
        ctl.latched = AlarmFlags {
            leak: true,
            water_source: false,
        };
        return (out, Some(StateId::ClosedAlarmed));
    }

    (out, None)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SOURCE FAULT: supply pressure too low to operate safely
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn water_source_fault(ctl: &mut ValveController, input: &Inputs) -> Step {
    ctl.sample(input);
    ctl.service_count_reset(input.delta_t);
    ctl.timer_2 = ctl.timer_2.saturating_add(input.delta_t);

    let cfg = &ctl.config;
    let overrun = ctl.timer_2 > cfg.open_limit_ms(input.away_switch_on);

    let mut out = ctl.outputs(Status::WaterSource);
    out.water_source_alarm_on = true;
    out.alarm_audio_on = true;
    out.valve_open = !overrun;

    if input.pressure > cfg.p_source_min {
        info!("SOURCE: supply pressure restored ({} mpsi)", input.pressure);
        out.water_source_alarm_on = false;
        out.alarm_audio_on = false;
        ctl.timer_2 = 0;
        return (out, Some(StateId::ClosedIdle));
    }

    if overrun {
        warn!("SOURCE: fault persisted {} ms, closing valve", ctl.timer_2);
        ctl.latched = AlarmFlags {
            leak: true,
            water_source: true,
        };
        return (out, Some(StateId::ClosedAlarmed));
    }

    if input.reset_button {
        ctl.latched = out.alarm_flags();
        return (out, Some(StateId::ClosedMuted));
    }

    (out, None)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALARMED: leak or overrun confirmed
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn closed_alarmed(ctl: &mut ValveController, input: &Inputs) -> Step {
    ctl.sample(input);

    let mut out = ctl.outputs(Status::Alarm);
    out.leak_alarm_on = true;
    out.water_source_alarm_on = ctl.latched.water_source;
    out.alarm_audio_on = true;

    if input.reset_button {
        info!("ALARMED: acknowledged, muting audio");
        ctl.latched = out.alarm_flags();
        return (out, Some(StateId::ClosedMuted));
    }

    (out, None)
}

// ═══════════════════════════════════════════════════════════════════════════
//  MUTED: acknowledged, visual alarms stay lit
// ═══════════════════════════════════════════════════════════════════════════

pub(super) fn closed_muted(ctl: &mut ValveController, input: &Inputs) -> Step {
    ctl.sample(input);

    let mut out = ctl.outputs(Status::Muted);
    out.leak_alarm_on = ctl.latched.leak;
    out.water_source_alarm_on = ctl.latched.water_source;

    if input.reset_button {
        return (out, Some(StateId::ClosedReset));
    }

    (out, None)
}
