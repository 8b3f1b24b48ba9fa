//! Output driver: valve solenoid, buzzer and the two alarm lamps.
//!
//! Four plain digital outputs behind `embedded-hal` 1.0 [`OutputPin`]s.
//! Every poll re-drives every pin from [`Outputs`], so a glitched pin is
//! corrected on the next poll without any bookkeeping here.
//!
//! ## Safety contract
//!
//! The valve pin is written first.  If it fails the remaining pins are
//! still driven so the alarm can sound; the first failure is reported.

use embedded_hal::digital::{OutputPin, PinState};
use log::error;

use crate::app::ports::ActuatorPort;
use crate::error::{Error, OutputChannel, Result};
use crate::fsm::context::Outputs;

pub struct OutputDriver<V, A, L, S> {
    valve: V,
    buzzer: A,
    leak_lamp: L,
    source_lamp: S,
}

impl<V, A, L, S> OutputDriver<V, A, L, S>
where
    V: OutputPin,
    A: OutputPin,
    L: OutputPin,
    S: OutputPin,
{
    pub fn new(valve: V, buzzer: A, leak_lamp: L, source_lamp: S) -> Self {
        Self {
            valve,
            buzzer,
            leak_lamp,
            source_lamp,
        }
    }

    /// Drive all four pins.  Returns the first channel that failed.
    pub fn try_apply(&mut self, out: &Outputs) -> Result<()> {
        let results = [
            drive(&mut self.valve, out.valve_open, OutputChannel::Valve),
            drive(&mut self.buzzer, out.alarm_audio_on, OutputChannel::Buzzer),
            drive(&mut self.leak_lamp, out.leak_alarm_on, OutputChannel::LeakLamp),
            drive(
                &mut self.source_lamp,
                out.water_source_alarm_on,
                OutputChannel::SourceLamp,
            ),
        ];
        results.into_iter().collect()
    }

    /// Give the pins back (shutdown, tests).
    pub fn release(self) -> (V, A, L, S) {
        (self.valve, self.buzzer, self.leak_lamp, self.source_lamp)
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool, channel: OutputChannel) -> Result<()> {
    pin.set_state(PinState::from(on)).map_err(|_| Error::Output(channel))
}

impl<V, A, L, S> ActuatorPort for OutputDriver<V, A, L, S>
where
    V: OutputPin,
    A: OutputPin,
    L: OutputPin,
    S: OutputPin,
{
    fn apply(&mut self, out: &Outputs) {
        if let Err(e) = self.try_apply(out) {
            error!("OUTPUT FAULT: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::context::Status;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    #[derive(Debug, Default)]
    struct MockPin {
        high: bool,
        writes: u32,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    fn alarm_outputs() -> Outputs {
        let mut out = Outputs::quiet(Status::Alarm, 0);
        out.alarm_audio_on = true;
        out.leak_alarm_on = true;
        out
    }

    #[test]
    fn pins_follow_outputs() {
        let mut drv = OutputDriver::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        );
        drv.try_apply(&alarm_outputs()).unwrap();
        let (valve, buzzer, leak, source) = drv.release();
        assert!(!valve.high);
        assert!(buzzer.high);
        assert!(leak.high);
        assert!(!source.high);
    }

    #[test]
    fn every_pin_is_redriven_each_poll() {
        let mut drv = OutputDriver::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        );
        drv.apply(&Outputs::default());
        drv.apply(&Outputs::default());
        let (valve, buzzer, leak, source) = drv.release();
        for pin in [valve, buzzer, leak, source] {
            assert_eq!(pin.writes, 2);
        }
    }

    #[test]
    fn valve_failure_still_drives_alarms() {
        let mut drv = OutputDriver::new(
            BrokenPin,
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        );
        assert_eq!(
            drv.try_apply(&alarm_outputs()),
            Err(Error::Output(OutputChannel::Valve))
        );
        let (_, buzzer, leak, _) = drv.release();
        assert!(buzzer.high);
        assert!(leak.high);
    }
}
