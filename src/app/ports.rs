//! Port traits: the boundary between the poll loop and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! The sensor driver, scheduler and input debouncer together implement
//! [`PollSource`]; the valve and annunciator drivers implement
//! [`ActuatorPort`]; anything that wants to hear about alarms implements
//! [`EventSink`].

use crate::fsm::context::{Inputs, Outputs};

// ───────────────────────────────────────────────────────────────
// Poll source (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one call per poll.
pub trait PollSource {
    /// Pressure, elapsed time and switch state for the next poll.
    /// `None` ends the loop (replay exhausted, shutdown requested).
    fn next_poll(&mut self) -> Option<Inputs>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: applies the level-driven outputs of one poll.
pub trait ActuatorPort {
    fn apply(&mut self, out: &Outputs);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / annunciation)
// ───────────────────────────────────────────────────────────────

pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

impl<I: Iterator<Item = Inputs>> PollSource for I {
    fn next_poll(&mut self) -> Option<Inputs> {
        self.next()
    }
}
