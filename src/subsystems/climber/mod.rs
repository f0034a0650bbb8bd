//! HAB climber.
//!
//! Pneumatic cylinders lift the back of the robot while the cargo arm
//! presses down on the platform edge at the front.  Wheels on the
//! cylinders and the drive base then pull the robot on top.
//!
//! The cargo arm owns climb mode.  It runs earlier in the same tick and
//! sets the mode flag and the mode-start edge the climber reads here.
//! With climb mode off the climber issues nothing at all, whatever
//! state it is in.  Turning climb mode off mid-climb leaves the last
//! commands in place and clears the tilt PID.

pub mod context;
pub mod states;

use log::info;

use crate::app::ports::{
    ArmPort, Button, Clock, DrivePort, ImuPort, MotorPort, OperatorInput, SolenoidPort,
    SolenoidPosition, TelemetrySink,
};
use crate::app::telemetry::TelemetrySource;
use crate::config::ClimberConfig;
use crate::drivers::motor::{LatchedMotor, MotorCommand};
use crate::drivers::solenoid::LatchedSolenoid;
use crate::error::Result;
use crate::fsm::{Fsm, StateSet};
use crate::looper::Loop;

use context::{ClimberCommands, ClimberContext, ClimberInputs, DriveCommand};
pub use states::ClimberState;

/// Everything the climber reads or drives that it does not own.
pub trait ClimberIo: Clock + OperatorInput + ImuPort + DrivePort + ArmPort {}

impl<T: Clock + OperatorInput + ImuPort + DrivePort + ArmPort + ?Sized> ClimberIo for T {}

pub struct Climber<M = Box<dyn MotorPort>, C = Box<dyn SolenoidPort>>
where
    M: MotorPort,
    C: SolenoidPort,
{
    fsm: Fsm<ClimberState, ClimberContext, { ClimberState::COUNT }>,
    ctx: ClimberContext,
    motor: LatchedMotor<M>,
    cylinders: LatchedSolenoid<C>,
}

impl<M: MotorPort, C: SolenoidPort> Climber<M, C> {
    /// `loop_period_secs` is the tilt PID's `dt`.
    pub fn new(config: ClimberConfig, loop_period_secs: f64, motor: M, cylinders: C) -> Result<Self> {
        config.validate()?;
        let fsm = Fsm::new(
            "Climber",
            states::build_state_table(),
            ClimberState::ArmsOnPlatformL3,
        )?;
        let motor = LatchedMotor::new(motor, config.motor_inverted, config.neutral_mode);
        Ok(Self {
            fsm,
            ctx: ClimberContext::new(config, loop_period_secs),
            motor,
            cylinders: LatchedSolenoid::new(cylinders),
        })
    }

    pub fn state(&self) -> ClimberState {
        self.fsm.current_state()
    }

    pub fn tilt_angle_deg(&self) -> f64 {
        self.ctx.inputs.pitch_deg
    }

    pub fn pid_output(&self) -> f64 {
        self.ctx.tilt_pid.output()
    }

    pub fn integral_error(&self) -> f64 {
        self.ctx.tilt_pid.integral()
    }

    /// Back to the first climb step without a full restart.
    pub fn start_over(&mut self) {
        self.fsm
            .force_transition(ClimberState::ArmsOnPlatformL3, &mut self.ctx);
    }

    fn sample<Io: ClimberIo + ?Sized>(&self, io: &Io) -> ClimberInputs {
        ClimberInputs {
            now: io.now_secs(),
            climb_start_pressed: io.climb_start_pressed(),
            extend_button: io.button(Button::ClimbExtend),
            retract_button: io.button(Button::ClimbRetract),
            pitch_deg: io.pitch_deg(),
            arm_angle_deg: io.arm_angle_deg(),
        }
    }

    fn apply<Io: ClimberIo + ?Sized>(&mut self, io: &mut Io) {
        let commands = self.ctx.commands;
        self.motor
            .command(MotorCommand::PercentOutput(commands.climb_motor));
        self.cylinders.set(commands.cylinders);

        match commands.drive {
            Some(DriveCommand::OpenLoop(out)) => io.set_open_loop(out, out),
            Some(DriveCommand::Coast) => io.coast(),
            None => {}
        }
        if let Some(enabled) = commands.arm_soft_limits {
            io.set_arm_soft_limits(enabled);
        }
        if let Some(target) = commands.arm_target {
            io.set_arm_target(target);
        }
        if let Some(out) = commands.arm_percent {
            io.set_arm_percent_output(out);
        }
    }
}

impl<Io, M, C> Loop<Io> for Climber<M, C>
where
    Io: ClimberIo + ?Sized,
    M: MotorPort,
    C: SolenoidPort,
{
    fn name(&self) -> &'static str {
        "Climber"
    }

    fn on_start(&mut self, io: &mut Io) {
        self.ctx.commands = ClimberCommands::SAFE_IDLE;
        self.ctx.tilt_pid.reset();
        self.ctx.inputs = ClimberInputs {
            now: io.now_secs(),
            ..ClimberInputs::default()
        };
        self.fsm.start(&mut self.ctx);
        self.cylinders.force(self.ctx.commands.cylinders);
        self.motor.force(MotorCommand::STOP);
    }

    fn on_loop(&mut self, io: &mut Io) {
        // Tilt is sampled for telemetry even while climb mode is off.
        let inputs = self.sample(io);
        self.ctx.inputs.pitch_deg = inputs.pitch_deg;

        if !io.climb_mode_enabled() {
            // No correction state survives the gap.
            self.ctx.tilt_pid.reset();
            return;
        }

        self.ctx.inputs = inputs;
        self.ctx.commands.clear_shared();
        self.fsm.tick(&mut self.ctx);
        self.apply(io);
    }

    fn on_stop(&mut self, _io: &mut Io) {
        self.cylinders.force(SolenoidPosition::Off);
        self.motor.force(MotorCommand::STOP);
        info!("Climber: stopped in {}", self.fsm.current_name());
    }
}

impl<M: MotorPort, C: SolenoidPort> TelemetrySource for Climber<M, C> {
    fn log(&self, sink: &mut dyn TelemetrySink) {
        let pid = &self.ctx.tilt_pid;
        sink.put("Climber/state", self.fsm.current_name().into());
        sink.put("Climber/tiltAngleDeg", self.ctx.inputs.pitch_deg.into());
        sink.put("Climber/error", pid.error().into());
        sink.put("Climber/derror", pid.error_rate().into());
        sink.put("Climber/iError", pid.integral().into());
        sink.put("Climber/pidOutput", pid.output().into());
    }
}
