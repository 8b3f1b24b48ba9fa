//! Per-poll data crossing the controller boundary.
//!
//! [`Inputs`] is what the device loop hands in once per poll; [`Outputs`]
//! is the fixed record handed back.  State handlers build a fresh
//! `Outputs` every poll, so nothing a previous state wrote can leak into
//! the current one.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inputs (read-only to state handlers; written by the device loop)
// ---------------------------------------------------------------------------

/// One poll worth of sensor and switch readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inputs {
    /// Line pressure (milli-psi), already range-checked by the sensor driver.
    #[serde(rename = "p")]
    pub pressure: i32,
    /// Milliseconds since the previous poll.
    #[serde(rename = "dt")]
    pub delta_t: u32,
    /// Momentary reset/mute button, true while pressed.
    #[serde(default, rename = "reset")]
    pub reset_button: bool,
    /// Latched away-mode switch.
    #[serde(default, rename = "away")]
    pub away_switch_on: bool,
}

impl Inputs {
    pub fn new(pressure: i32, delta_t: u32) -> Self {
        Self {
            pressure,
            delta_t,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_reset(mut self) -> Self {
        self.reset_button = true;
        self
    }

    #[must_use]
    pub fn with_away(mut self, away: bool) -> Self {
        self.away_switch_on = away;
        self
    }
}

// ---------------------------------------------------------------------------
// Status (one tag per state; formatting lives in `display`)
// ---------------------------------------------------------------------------

/// What the status display should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Reset,
    Off,
    /// Valve closed, leak suspected; carries the dwell count so far.
    Counting(u32),
    On,
    WaterSource,
    Alarm,
    Muted,
}

// ---------------------------------------------------------------------------
// Alarm flags latched across the mute state
// ---------------------------------------------------------------------------

/// Visual alarms that stay lit while the audible alarm is muted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlarmFlags {
    pub leak: bool,
    pub water_source: bool,
}

// ---------------------------------------------------------------------------
// Outputs (written by state handlers; consumed by the actuator layer)
// ---------------------------------------------------------------------------

/// Everything the actuator and display layers need after one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outputs {
    /// Last emitted rate sample (milli-psi/s).  Stale unless
    /// `delta_p_fresh` is set.
    pub delta_p: i32,
    /// True if `delta_p` was emitted on this poll.
    pub delta_p_fresh: bool,
    pub status: Status,
    pub valve_open: bool,
    pub alarm_audio_on: bool,
    pub leak_alarm_on: bool,
    pub water_source_alarm_on: bool,
}

impl Outputs {
    /// Valve closed, every alarm off.
    pub fn quiet(status: Status, delta_p: i32) -> Self {
        Self {
            delta_p,
            delta_p_fresh: false,
            status,
            valve_open: false,
            alarm_audio_on: false,
            leak_alarm_on: false,
            water_source_alarm_on: false,
        }
    }

    /// Visual alarm flags as currently asserted.
    pub fn alarm_flags(&self) -> AlarmFlags {
        AlarmFlags {
            leak: self.leak_alarm_on,
            water_source: self.water_source_alarm_on,
        }
    }
}

impl Default for Outputs {
    fn default() -> Self {
        Self::quiet(Status::Off, 0)
    }
}
