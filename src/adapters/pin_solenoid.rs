//! Valves driven straight from GPIO through `embedded-hal` output pins.
//!
//! - [`PinSolenoid`]: single-acting, one coil.  Extend energises it,
//!   Retract and Off both drop it (the spring returns the cylinder).
//! - [`DoublePinSolenoid`]: double-acting, one coil per side.  The
//!   active side is released before the other is energised, so both
//!   coils are never high at once.
//!
//! Pin errors are logged and otherwise ignored.  A failed write leaves
//! the valve where it was.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{SolenoidPort, SolenoidPosition};

pub struct PinSolenoid<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> PinSolenoid<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> SolenoidPort for PinSolenoid<P> {
    fn set_position(&mut self, position: SolenoidPosition) {
        let result = match position {
            SolenoidPosition::Extend => self.pin.set_high(),
            SolenoidPosition::Retract | SolenoidPosition::Off => self.pin.set_low(),
        };
        if let Err(e) = result {
            warn!("PinSolenoid: write {} failed: {:?}", position.name(), e);
        }
    }
}

pub struct DoublePinSolenoid<F: OutputPin, R: OutputPin> {
    forward: F,
    reverse: R,
}

impl<F: OutputPin, R: OutputPin> DoublePinSolenoid<F, R> {
    pub fn new(forward: F, reverse: R) -> Self {
        Self { forward, reverse }
    }

    pub fn release(self) -> (F, R) {
        (self.forward, self.reverse)
    }

    fn write(&mut self, position: SolenoidPosition) -> Result<(), &'static str> {
        match position {
            SolenoidPosition::Extend => {
                self.reverse.set_low().map_err(|_| "reverse low")?;
                self.forward.set_high().map_err(|_| "forward high")
            }
            SolenoidPosition::Retract => {
                self.forward.set_low().map_err(|_| "forward low")?;
                self.reverse.set_high().map_err(|_| "reverse high")
            }
            SolenoidPosition::Off => {
                self.forward.set_low().map_err(|_| "forward low")?;
                self.reverse.set_low().map_err(|_| "reverse low")
            }
        }
    }
}

impl<F: OutputPin, R: OutputPin> SolenoidPort for DoublePinSolenoid<F, R> {
    fn set_position(&mut self, position: SolenoidPosition) {
        if let Err(step) = self.write(position) {
            warn!("DoublePinSolenoid: write {} failed at {}", position.name(), step);
        }
    }
}
