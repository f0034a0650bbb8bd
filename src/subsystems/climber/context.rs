//! Climber blackboard.
//!
//! Commands come in two kinds.  The climb motor and the cylinders
//! belong to the climber and hold their last value between ticks.  The
//! drive base and the cargo arm belong to other loops; a command for
//! them is valid for one tick only and `None` leaves them alone.

use crate::app::ports::{ArmPosition, SolenoidPosition};
use crate::config::ClimberConfig;
use crate::control::pid::PidCorrection;
use crate::control::timer::TimedWait;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClimberInputs {
    pub now: f64,
    /// Climb-mode button pressed again this tick (owned by the cargo arm).
    pub climb_start_pressed: bool,
    /// Extend and retract are level-triggered.
    pub extend_button: bool,
    pub retract_button: bool,
    pub pitch_deg: f64,
    pub arm_angle_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    /// Same output on both sides.
    OpenLoop(f64),
    Coast,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimberCommands {
    pub climb_motor: f64,
    pub cylinders: SolenoidPosition,
    pub drive: Option<DriveCommand>,
    pub arm_target: Option<ArmPosition>,
    pub arm_percent: Option<f64>,
    pub arm_soft_limits: Option<bool>,
}

impl ClimberCommands {
    /// Motor stopped, cylinders in, shared collaborators untouched.
    pub const SAFE_IDLE: Self = Self {
        climb_motor: 0.0,
        cylinders: SolenoidPosition::Retract,
        drive: None,
        arm_target: None,
        arm_percent: None,
        arm_soft_limits: None,
    };

    /// Drop the one-tick commands.
    pub fn clear_shared(&mut self) {
        self.drive = None;
        self.arm_target = None;
        self.arm_percent = None;
        self.arm_soft_limits = None;
    }
}

pub struct ClimberContext {
    pub config: ClimberConfig,
    pub inputs: ClimberInputs,
    pub commands: ClimberCommands,
    pub tilt_pid: PidCorrection,
    /// When the retract button was pressed.  Both remaining waits are
    /// measured from here.
    pub retract_started: f64,
    pub wait: TimedWait,
}

impl ClimberContext {
    pub fn new(config: ClimberConfig, loop_period_secs: f64) -> Self {
        let tilt_pid = PidCorrection::new(config.tilt_gains, loop_period_secs);
        Self {
            config,
            inputs: ClimberInputs::default(),
            commands: ClimberCommands::SAFE_IDLE,
            tilt_pid,
            retract_started: 0.0,
            wait: TimedWait::new(0.0, 0.0),
        }
    }

    pub fn drive_forward(&mut self) {
        self.commands.drive = Some(DriveCommand::OpenLoop(self.config.drive_percent_output));
    }
}
