//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the
//! `log` facade.  Per-poll records go out at `debug` so a normal `info`
//! log only shows what changed.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::display;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Poll(out) => {
                debug!(
                    "POLL | {} | valve={} audio={} leak={} source={} | dP={}mpsi/s",
                    display::label(out.status),
                    if out.valve_open { "OPEN" } else { "closed" },
                    out.alarm_audio_on,
                    out.leak_alarm_on,
                    out.water_source_alarm_on,
                    out.delta_p,
                );
            }
            AppEvent::RateSample(rate) => {
                debug!("RATE | {} mpsi/s", rate);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from.name(), to.name());
            }
            AppEvent::LeakConfirmed { samples } => {
                warn!("LEAK | confirmed after {} rate samples", samples);
            }
            AppEvent::OpenDwellExceeded { open_ms } => {
                warn!("DWELL | valve open {} ms, over limit", open_ms);
            }
            AppEvent::WaterSourceFault => {
                warn!("SOURCE | supply pressure low");
            }
            AppEvent::AlarmMuted => {
                info!("ALARM | muted");
            }
            AppEvent::Reset => {
                info!("ALARM | reset");
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state.name());
            }
        }
    }
}
