//! Controller configuration parameters
//!
//! Every threshold and window the controller uses.  The defaults are the
//! reference table for a residential supply line; confirm them against the
//! installed pressure sensor and valve before deployment.
//!
//! Units: pressures in milli-psi, rates in milli-psi per second, times in
//! milliseconds, leak dwell in rate samples.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodConfig {
    // --- Leak band ---
    /// Rates above this are quiescent noise (milli-psi/s)
    pub delta_p_quiescent_max: i32,
    /// Rates below this are active water use (milli-psi/s)
    pub delta_p_use_min: i32,

    // --- Pressure ladder ---
    /// Valve closes once line pressure recovers above this (milli-psi)
    pub p_open_max: i32,
    /// Valve opens when line pressure sags below this (milli-psi)
    pub p_closed_min: i32,
    /// Supply fault below this (milli-psi)
    pub p_source_min: i32,

    // --- Dwell limits ---
    /// Maximum continuous open time with the away switch on (ms)
    pub t_open_away_ms: u32,
    /// Maximum continuous open time at home (ms)
    pub t_open_home_ms: u32,
    /// Rate samples inside the leak band before the leak is confirmed
    pub leak_timeout_samples: u32,

    // --- Rate estimator ---
    /// Windowed emission period of the rate estimator (ms)
    pub rate_window_ms: u32,
    /// Pressure drop that emits a rate sample immediately (milli-psi)
    pub fast_drop_mpsi: i32,

    // --- Watchdog ---
    /// Leak dwell is forgotten if no counting activity happens for this long (ms)
    pub count_reset_window_ms: u32,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            // Leak band
            delta_p_quiescent_max: -300,
            delta_p_use_min: -3000,

            // Pressure ladder
            p_open_max: 65_000,
            p_closed_min: 45_000,
            p_source_min: 35_000,

            // Dwell limits
            t_open_away_ms: 30_000,      // 30 s
            t_open_home_ms: 1_200_000,   // 20 min
            leak_timeout_samples: 10,

            // Rate estimator
            rate_window_ms: 5_000,
            fast_drop_mpsi: 4_000,

            // Watchdog
            count_reset_window_ms: 300_000, // 5 min
        }
    }
}

impl FloodConfig {
    /// Check the table for values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_window_ms == 0 {
            return Err(ConfigError::ZeroRateWindow);
        }
        if self.count_reset_window_ms == 0 {
            return Err(ConfigError::ZeroCountResetWindow);
        }
        if self.fast_drop_mpsi <= 0 {
            return Err(ConfigError::NonPositiveFastDrop);
        }
        if self.leak_timeout_samples == 0 {
            return Err(ConfigError::ZeroLeakTimeout);
        }
        if self.delta_p_use_min >= self.delta_p_quiescent_max {
            return Err(ConfigError::EmptyLeakBand);
        }
        if !(self.p_source_min < self.p_closed_min && self.p_closed_min < self.p_open_max) {
            return Err(ConfigError::PressureLadder);
        }
        Ok(())
    }

    /// Encode as a compact postcard blob for non-volatile storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Encode)
    }

    /// Decode a postcard blob and validate it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Open-valve dwell limit for the selected mode.
    pub fn open_limit_ms(&self, away_switch_on: bool) -> u32 {
        if away_switch_on {
            self.t_open_away_ms
        } else {
            self.t_open_home_ms
        }
    }

    /// True if `rate` lies strictly inside the leak band.
    pub fn in_leak_band(&self, rate: i32) -> bool {
        rate > self.delta_p_use_min && rate < self.delta_p_quiescent_max
    }
}
