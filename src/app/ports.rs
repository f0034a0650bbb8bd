//! Port traits: the hexagonal boundary between the state machines and the robot.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Subsystem (domain)
//! ```
//!
//! Motor controllers, pneumatic valves, the drive base, the IMU, the
//! operator console and the cooperating cargo arm all sit on the far
//! side of these traits.  Subsystems consume them via generics, so the
//! state logic never touches hardware directly and every transition
//! table can be exercised with mock adapters.
//!
//! All calls are non-blocking: a write queues a command for the device,
//! a read returns the most recent sample.

use serde::{Deserialize, Serialize};

// ───────────────────────────────────────────────────────────────
// Pneumatics
// ───────────────────────────────────────────────────────────────

/// Commanded position of a pneumatic valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolenoidPosition {
    Extend,
    Retract,
    /// Neither side energised; the cylinder holds wherever it is.
    Off,
}

impl SolenoidPosition {
    pub fn name(self) -> &'static str {
        match self {
            Self::Extend => "Extend",
            Self::Retract => "Retract",
            Self::Off => "Off",
        }
    }
}

/// Write-side port for a single- or double-acting valve.
///
/// Callers are expected to suppress repeated identical commands
/// (see [`LatchedSolenoid`](crate::drivers::solenoid::LatchedSolenoid)).
pub trait SolenoidPort {
    fn set_position(&mut self, position: SolenoidPosition);
}

impl<T: SolenoidPort + ?Sized> SolenoidPort for Box<T> {
    fn set_position(&mut self, position: SolenoidPosition) {
        (**self).set_position(position);
    }
}

// ───────────────────────────────────────────────────────────────
// Motor controllers
// ───────────────────────────────────────────────────────────────

/// What the motor does when commanded to zero output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeutralMode {
    Coast,
    Brake,
}

/// Limit-switch and soft-limit flags latched by the motor controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitFaults {
    pub forward_limit_switch: bool,
    pub reverse_limit_switch: bool,
    pub forward_soft_limit: bool,
    pub reverse_soft_limit: bool,
}

/// A smart motor controller: open-loop output, on-board closed-loop
/// position control, and feedback.
pub trait MotorPort {
    /// Open-loop output in `[-1, 1]`.
    fn set_percent_output(&mut self, output: f64);

    /// Closed-loop position target in sensor units.
    fn set_closed_loop_target(&mut self, target: f64);

    fn set_neutral_mode(&mut self, mode: NeutralMode);

    fn set_inverted(&mut self, inverted: bool);

    /// Fault flags sampled this tick.
    fn limit_faults(&self) -> LimitFaults;

    /// Selected sensor position in sensor units.
    fn position(&self) -> f64;

    /// Selected sensor velocity in sensor units per 100 ms.
    fn velocity(&self) -> f64;

    fn output_current(&self) -> f64;

    fn closed_loop_error(&self) -> f64;
}

impl<T: MotorPort + ?Sized> MotorPort for Box<T> {
    fn set_percent_output(&mut self, output: f64) {
        (**self).set_percent_output(output);
    }
    fn set_closed_loop_target(&mut self, target: f64) {
        (**self).set_closed_loop_target(target);
    }
    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        (**self).set_neutral_mode(mode);
    }
    fn set_inverted(&mut self, inverted: bool) {
        (**self).set_inverted(inverted);
    }
    fn limit_faults(&self) -> LimitFaults {
        (**self).limit_faults()
    }
    fn position(&self) -> f64 {
        (**self).position()
    }
    fn velocity(&self) -> f64 {
        (**self).velocity()
    }
    fn output_current(&self) -> f64 {
        (**self).output_current()
    }
    fn closed_loop_error(&self) -> f64 {
        (**self).closed_loop_error()
    }
}

// ───────────────────────────────────────────────────────────────
// Shared robot collaborators (read and written through the loop Io)
// ───────────────────────────────────────────────────────────────

/// The drive base, owned by another loop.  Subsystems may borrow it
/// for open-loop nudges.
pub trait DrivePort {
    fn set_open_loop(&mut self, left: f64, right: f64);
    fn coast(&mut self);
}

/// Inertial sensor.  Readings are not validated; a stale value flows
/// straight into whatever consumes it.
pub trait ImuPort {
    fn pitch_deg(&self) -> f64;
}

/// Named positions the cargo arm can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmPosition {
    Retracted,
    HabLevel3,
    HabLevel2,
    Ground,
    /// Past the normal range; only reachable with soft limits off.
    Pushup,
}

/// The cargo arm / intake.  It owns climb mode: it sets the flag and
/// the mode-start edge earlier in the same tick, the climber reads them.
pub trait ArmPort {
    fn climb_mode_enabled(&self) -> bool;

    /// True on the tick the climb-mode button was pressed again.
    fn climb_start_pressed(&self) -> bool;

    fn arm_angle_deg(&self) -> f64;

    fn set_arm_target(&mut self, position: ArmPosition);

    fn set_arm_percent_output(&mut self, output: f64);

    fn set_arm_soft_limits(&mut self, enabled: bool);
}

// ───────────────────────────────────────────────────────────────
// Operator console and time
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Grab on the hatch, ground excursion on the hatch deploy arm.
    HatchDeploy,
    HumanStation,
    Defense,
    ClimbExtend,
    ClimbRetract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Trigger: extend on the hatch, ejector on the hatch deploy arm.
    HatchShoot,
}

/// Level-based operator input, sampled once per tick.
pub trait OperatorInput {
    fn button(&self, button: Button) -> bool;

    /// An analog axis thresholded into a boolean.
    fn axis_as_button(&self, axis: Axis) -> bool;

    /// True while the operator is driving cargo.  Hatch inputs are
    /// ignored in that mode.
    fn driving_cargo(&self) -> bool;
}

/// Monotonic time source in seconds.
pub trait Clock {
    fn now_secs(&self) -> f64;
}

// ───────────────────────────────────────────────────────────────
// Telemetry (domain → dashboard)
// ───────────────────────────────────────────────────────────────

/// Write-only key/value sink.  A missing consumer must not change
/// control behaviour, so nothing here returns a value.
pub trait TelemetrySink {
    fn put(&mut self, key: &str, value: super::telemetry::TelemetryValue);
}
