//! FloodSaver replay harness.
//!
//! Runs a recorded poll sequence through the controller on the host and
//! prints what the display and outputs would have shown each poll.
//!
//! ```text
//! floodsaver-replay <scenario.jsonl> [config.json | config.bin]
//! ```
//!
//! A `.bin` config is the postcard blob the device keeps in flash; any
//! other extension is read as JSON.
//!
//! ```text
//!  ReplaySource ──▶ AppService ──▶ PrintOutputs (stdout)
//!                       │
//!                       └──────▶ LogEventSink (log facade)
//! ```
#![deny(unused_must_use)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use floodsaver::FloodConfig;
use floodsaver::adapters::log_sink::LogEventSink;
use floodsaver::adapters::replay::ReplaySource;
use floodsaver::app::ports::ActuatorPort;
use floodsaver::app::service::AppService;
use floodsaver::display;
use floodsaver::fsm::context::Outputs;

/// Stand-in for the output driver: one line per poll on stdout.  Line 0
/// is the idle level driven at start.
struct PrintOutputs {
    poll: u64,
}

impl ActuatorPort for PrintOutputs {
    fn apply(&mut self, out: &Outputs) {
        println!(
            "{:>6} | {} | valve={} audio={} leak={} source={} | dP={}{}",
            self.poll,
            display::label(out.status),
            u8::from(out.valve_open),
            u8::from(out.alarm_audio_on),
            u8::from(out.leak_alarm_on),
            u8::from(out.water_source_alarm_on),
            out.delta_p,
            if out.delta_p_fresh { " *" } else { "" },
        );
        self.poll += 1;
    }
}

fn load_config(path: Option<&str>) -> Result<FloodConfig> {
    let Some(path) = path else {
        return Ok(FloodConfig::default());
    };
    if Path::new(path).extension().is_some_and(|ext| ext == "bin") {
        let bytes = fs::read(path).with_context(|| format!("reading config {path}"))?;
        return FloodConfig::from_bytes(&bytes).with_context(|| format!("decoding config {path}"));
    }
    let text = fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    let config: FloodConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))?;
    Ok(config)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(scenario_path) = args.first() else {
        bail!("usage: floodsaver-replay <scenario.jsonl> [config.json | config.bin]");
    };

    let config = load_config(args.get(1).map(String::as_str))?;
    let text = fs::read_to_string(scenario_path)
        .with_context(|| format!("reading scenario {scenario_path}"))?;
    let mut src = ReplaySource::parse(&text).context("parsing scenario")?;

    let mut app = AppService::new(config).context("building controller")?;
    let mut hw = PrintOutputs { poll: 0 };
    let mut sink = LogEventSink::new();

    app.start(&mut hw, &mut sink);
    let polls = app.run_to_end(&mut src, &mut hw, &mut sink);

    println!("{} polls, final state {}", polls, app.state().name());
    Ok(())
}
