//! Pneumatic valve driver.
//!
//! Only talks to the valve when the commanded position changes.  The
//! same position requested every tick costs nothing on the bus.

use crate::app::ports::{SolenoidPort, SolenoidPosition};

use super::latch::Latch;

pub struct LatchedSolenoid<P: SolenoidPort> {
    port: P,
    latch: Latch<SolenoidPosition>,
}

impl<P: SolenoidPort> LatchedSolenoid<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            latch: Latch::new(),
        }
    }

    /// Issue `position` if it differs from the last issued one.
    pub fn set(&mut self, position: SolenoidPosition) {
        if self.latch.update(position) {
            self.port.set_position(position);
        }
    }

    /// Issue `position` unconditionally.  Used on start and stop, when
    /// the valve may have been moved by someone else.
    pub fn force(&mut self, position: SolenoidPosition) {
        self.latch.set(position);
        self.port.set_position(position);
    }

    /// Last position sent to the valve.
    pub fn position(&self) -> Option<SolenoidPosition> {
        self.latch.last()
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}
