//! Shared context for the hatch deploy arm handlers.

use crate::app::ports::LimitFaults;
use crate::config::HatchDeployConfig;
use crate::control::timer::TimedWait;
use crate::drivers::motor::MotorCommand;

/// Sampled once per tick before the FSM runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployInputs {
    pub now: f64,
    pub driving_hatch: bool,
    /// Hatch-deploy button rising edge.
    pub hatch_pressed: bool,
    /// Human-station button rising edge.
    pub human_pressed: bool,
    /// Defense button level.
    pub defense: bool,
    pub faults: LimitFaults,
}

pub struct DeployContext {
    pub config: HatchDeployConfig,
    pub inputs: DeployInputs,
    pub motor: MotorCommand,
    /// Last closed-loop target, for telemetry.
    pub target_position: f64,
    /// Set once the reverse limit has been seen.  Survives restarts.
    pub zeroed: bool,
    pub wait: TimedWait,
}

impl DeployContext {
    pub fn new(config: HatchDeployConfig) -> Self {
        Self {
            config,
            inputs: DeployInputs::default(),
            motor: MotorCommand::STOP,
            target_position: 0.0,
            zeroed: false,
            wait: TimedWait::new(0.0, 0.0),
        }
    }

    pub fn set_target(&mut self, position: f64) {
        self.motor = MotorCommand::Position(position);
        self.target_position = position;
    }
}
