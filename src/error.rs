//! Error types for the FloodSaver controller.
//!
//! The per-poll path never fails: every input is a precondition owned by
//! the collaborator that produced it.  Errors only exist at construction
//! time (bad threshold table) and at the adapter edges (replay input,
//! output pins).  All variants are `Copy` so they can be logged and passed
//! around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The threshold table failed validation.
    Config(ConfigError),
    /// A replay scenario line could not be parsed.
    Replay(ReplayError),
    /// An output pin refused a write.
    Output(OutputChannel),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Replay(e) => write!(f, "replay: {e}"),
            Self::Output(ch) => write!(f, "output: {ch} pin write failed"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `rate_window_ms` is zero; the estimator could never overflow.
    ZeroRateWindow,
    /// `count_reset_window_ms` is zero.
    ZeroCountResetWindow,
    /// `leak_timeout_samples` is zero; every sample would alarm.
    ZeroLeakTimeout,
    /// `delta_p_use_min` is not below `delta_p_quiescent_max`.
    EmptyLeakBand,
    /// Pressure thresholds are not ordered `source < closed < open`.
    PressureLadder,
    /// `fast_drop_mpsi` is not positive; every poll would emit a sample.
    NonPositiveFastDrop,
    /// A stored binary table could not be decoded.
    Corrupted,
    /// The table could not be encoded.
    Encode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRateWindow => write!(f, "rate window must be non-zero"),
            Self::ZeroCountResetWindow => write!(f, "count reset window must be non-zero"),
            Self::ZeroLeakTimeout => write!(f, "leak timeout must be at least one sample"),
            Self::EmptyLeakBand => write!(f, "use minimum must be below quiescent maximum"),
            Self::PressureLadder => {
                write!(f, "pressure thresholds must satisfy source < closed < open")
            }
            Self::NonPositiveFastDrop => write!(f, "fast drop threshold must be positive"),
            Self::Corrupted => write!(f, "stored config is corrupted"),
            Self::Encode => write!(f, "config could not be encoded"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Replay errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayError {
    /// Line `n` (1-based) is not a valid poll record.
    Malformed { line: usize },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { line } => write!(f, "line {line} is not a valid poll record"),
        }
    }
}

impl From<ReplayError> for Error {
    fn from(e: ReplayError) -> Self {
        Self::Replay(e)
    }
}

// ---------------------------------------------------------------------------
// Output channels
// ---------------------------------------------------------------------------

/// The four physical outputs driven from [`Outputs`](crate::fsm::context::Outputs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    Valve,
    Buzzer,
    LeakLamp,
    SourceLamp,
}

impl fmt::Display for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valve => write!(f, "valve"),
            Self::Buzzer => write!(f, "buzzer"),
            Self::LeakLamp => write!(f, "leak lamp"),
            Self::SourceLamp => write!(f, "source lamp"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
