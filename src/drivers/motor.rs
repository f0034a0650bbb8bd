//! Smart motor controller driver.
//!
//! Wraps a [`MotorPort`] with one-time configuration and duplicate
//! suppression for output commands.  Feedback reads pass straight
//! through to the port.

use crate::app::ports::{LimitFaults, MotorPort, NeutralMode};

use super::latch::Latch;

/// One output command for the motor controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorCommand {
    /// Open-loop output in `[-1, 1]`.
    PercentOutput(f64),
    /// Closed-loop position target in sensor units.
    Position(f64),
}

impl MotorCommand {
    pub const STOP: Self = Self::PercentOutput(0.0);
}

pub struct LatchedMotor<M: MotorPort> {
    motor: M,
    latch: Latch<MotorCommand>,
}

impl<M: MotorPort> LatchedMotor<M> {
    /// Take ownership of the controller and apply its static settings.
    pub fn new(mut motor: M, inverted: bool, neutral_mode: NeutralMode) -> Self {
        motor.set_inverted(inverted);
        motor.set_neutral_mode(neutral_mode);
        Self {
            motor,
            latch: Latch::new(),
        }
    }

    pub fn command(&mut self, command: MotorCommand) {
        if self.latch.update(command) {
            self.write(command);
        }
    }

    pub fn force(&mut self, command: MotorCommand) {
        self.latch.set(command);
        self.write(command);
    }

    pub fn last_command(&self) -> Option<MotorCommand> {
        self.latch.last()
    }

    pub fn limit_faults(&self) -> LimitFaults {
        self.motor.limit_faults()
    }

    pub fn position(&self) -> f64 {
        self.motor.position()
    }

    pub fn output_current(&self) -> f64 {
        self.motor.output_current()
    }

    pub fn closed_loop_error(&self) -> f64 {
        self.motor.closed_loop_error()
    }

    pub fn port(&self) -> &M {
        &self.motor
    }

    fn write(&mut self, command: MotorCommand) {
        match command {
            MotorCommand::PercentOutput(out) => self.motor.set_percent_output(out),
            MotorCommand::Position(target) => self.motor.set_closed_loop_target(target),
        }
    }
}
