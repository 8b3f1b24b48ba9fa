//! Fuzz target: `ValveController::run`
//!
//! Slices the fuzz bytes into 9-byte polls `(pressure: i32, delta_t: u32,
//! flags: u8)` and runs them through a default controller.
//!
//! Invariants checked:
//! - No panics or arithmetic overflow under any poll sequence
//! - The valve is never commanded open while the leak lamp is lit
//! - The buzzer is only ever on with a lamp lit
//! - A reset poll from `ClosedMuted` always ends in `ClosedReset`
//!
//! cargo fuzz run fuzz_controller

#![no_main]

use floodsaver::fsm::context::Inputs;
use floodsaver::{StateId, ValveController};
use libfuzzer_sys::fuzz_target;

const POLL_LEN: usize = 9;

fuzz_target!(|data: &[u8]| {
    let mut ctl = ValveController::default();

    for chunk in data.chunks_exact(POLL_LEN) {
        let pressure = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let delta_t = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
        let input = Inputs {
            pressure,
            delta_t,
            reset_button: chunk[8] & 0x01 != 0,
            away_switch_on: chunk[8] & 0x02 != 0,
        };

        let from = ctl.state();
        let out = ctl.run(&input);

        if out.leak_alarm_on {
            assert!(!out.valve_open, "valve open with leak alarm lit");
        }
        if out.alarm_audio_on {
            assert!(
                out.leak_alarm_on || out.water_source_alarm_on,
                "buzzer without an alarm lamp"
            );
        }
        if from == StateId::ClosedMuted && input.reset_button {
            assert_eq!(ctl.state(), StateId::ClosedReset);
        }
    }
});
