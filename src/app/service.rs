//! Application service: the device poll loop.
//!
//! [`AppService`] owns the controller.  The device scheduler calls
//! [`tick`](AppService::tick) once per poll; the service pulls inputs,
//! runs the controller to completion, applies the outputs and reports
//! events.  Nothing here blocks or allocates.
//!
//! ```text
//!  PollSource ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//! ActuatorPort ◀──│    ValveController      │
//!                 └────────────────────────┘
//! ```

use log::info;

use crate::config::FloodConfig;
use crate::error::Result;
use crate::fsm::context::Outputs;
use crate::fsm::{StateId, ValveController};

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, PollSource};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// Poll loop around one valve.  Run one service per valve.
pub struct AppService {
    ctl: ValveController,
    poll_count: u64,
    last_outputs: Outputs,
}

impl AppService {
    /// Construct the service from a threshold table.
    pub fn new(config: FloodConfig) -> Result<Self> {
        Ok(Self::with_controller(ValveController::new(config)?))
    }

    pub fn with_controller(ctl: ValveController) -> Self {
        Self {
            ctl,
            poll_count: 0,
            last_outputs: Outputs::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to its idle level and announce the start state.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.apply(&self.last_outputs);
        sink.emit(&AppEvent::Started(self.ctl.state()));
        info!("AppService started in {}", self.ctl.state().name());
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one poll: read inputs → controller → actuators → events.
    /// Returns `None` once the source is exhausted.
    pub fn tick(
        &mut self,
        src: &mut impl PollSource,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Option<Outputs> {
        let input = src.next_poll()?;
        self.poll_count += 1;

        let from = self.ctl.state();

        let out = self.ctl.run(&input);
        hw.apply(&out);

        if out.delta_p_fresh {
            sink.emit(&AppEvent::RateSample(out.delta_p));
        }

        let to = self.ctl.state();
        if to != from {
            let (t1, t2) = (self.ctl.timer_1(), self.ctl.timer_2());
            if let Some(ev) = AppEvent::for_transition(from, to, t1, t2) {
                sink.emit(&ev);
            }
            sink.emit(&AppEvent::StateChanged { from, to });
        }
        sink.emit(&AppEvent::Poll(out));

        self.last_outputs = out;
        Some(out)
    }

    /// Tick until the source runs dry.  Returns the number of polls run.
    pub fn run_to_end(
        &mut self,
        src: &mut impl PollSource,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> u64 {
        let start = self.poll_count;
        while self.tick(src, hw, sink).is_some() {}
        self.poll_count - start
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.ctl.state()
    }

    pub fn controller(&self) -> &ValveController {
        &self.ctl
    }

    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    /// Outputs of the most recent poll.
    pub fn last_outputs(&self) -> &Outputs {
        &self.last_outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::context::Inputs;

    struct NullHw;
    impl ActuatorPort for NullHw {
        fn apply(&mut self, _out: &Outputs) {}
    }

    struct VecSink(Vec<AppEvent>);
    impl EventSink for VecSink {
        fn emit(&mut self, event: &AppEvent) {
            self.0.push(event.clone());
        }
    }

    #[test]
    fn tick_returns_none_when_source_exhausted() {
        let mut app = AppService::new(FloodConfig::default()).unwrap();
        let mut src = core::iter::empty::<Inputs>();
        assert!(app.tick(&mut src, &mut NullHw, &mut VecSink(Vec::new())).is_none());
        assert_eq!(app.poll_count(), 0);
    }

    #[test]
    fn run_to_end_counts_polls() {
        let mut app = AppService::new(FloodConfig::default()).unwrap();
        let mut src = core::iter::repeat(Inputs::new(55_000, 1000)).take(5);
        let n = app.run_to_end(&mut src, &mut NullHw, &mut VecSink(Vec::new()));
        assert_eq!(n, 5);
        assert_eq!(app.state(), StateId::ClosedIdle);
    }

    #[test]
    fn open_dwell_event_reports_elapsed_time() {
        let mut app = AppService::new(FloodConfig::default()).unwrap();
        let mut sink = VecSink(Vec::new());
        let polls = [
            Inputs::new(40_000, 100).with_away(true),
            Inputs::new(40_000, 30_000).with_away(true),
            Inputs::new(40_000, 1000).with_away(true),
        ];
        app.run_to_end(&mut polls.into_iter(), &mut NullHw, &mut sink);
        assert_eq!(app.state(), StateId::ClosedAlarmed);
        assert!(sink.0.contains(&AppEvent::OpenDwellExceeded { open_ms: 31_000 }));
    }
}
