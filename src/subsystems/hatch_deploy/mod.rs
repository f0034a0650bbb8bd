//! Hatch deploy arm.
//!
//! A position-controlled arm that swings the hatch mechanism between the
//! bumper, the ground and the human loading station, plus an ejector
//! valve that fires the hatch off the fingers.  The ejector follows the
//! trigger on its own and is not part of the arm's state table, so the
//! two run side by side inside one loop.
//!
//! On first start the arm drives gently into its reverse limit switch to
//! find zero.  The calibration is kept for the rest of the session, so a
//! restart skips straight to holding at the bumper.

pub mod context;
pub mod states;

use log::info;

use crate::app::ports::{
    Axis, Button, Clock, MotorPort, OperatorInput, SolenoidPort, SolenoidPosition, TelemetrySink,
};
use crate::app::telemetry::TelemetrySource;
use crate::config::HatchDeployConfig;
use crate::control::edge::{ButtonEdges, EdgeDetector};
use crate::drivers::motor::{LatchedMotor, MotorCommand};
use crate::drivers::solenoid::LatchedSolenoid;
use crate::error::Result;
use crate::fsm::{Fsm, StateSet};
use crate::looper::Loop;

use context::{DeployContext, DeployInputs};
pub use states::HatchDeployState;

pub struct HatchDeploy<M = Box<dyn MotorPort>, V = Box<dyn SolenoidPort>>
where
    M: MotorPort,
    V: SolenoidPort,
{
    fsm: Fsm<HatchDeployState, DeployContext, { HatchDeployState::COUNT }>,
    ctx: DeployContext,
    hatch_button: EdgeDetector,
    human_button: EdgeDetector,
    eject_trigger: ButtonEdges,
    motor: LatchedMotor<M>,
    ejector: LatchedSolenoid<V>,
}

impl<M: MotorPort, V: SolenoidPort> HatchDeploy<M, V> {
    pub fn new(config: HatchDeployConfig, motor: M, ejector: V) -> Result<Self> {
        config.validate()?;
        let fsm = Fsm::new(
            "HatchDeploy",
            states::build_state_table(),
            HatchDeployState::Init,
        )?;
        let motor = LatchedMotor::new(motor, config.motor_inverted, config.neutral_mode);
        Ok(Self {
            fsm,
            ctx: DeployContext::new(config),
            hatch_button: EdgeDetector::rising(),
            human_button: EdgeDetector::rising(),
            eject_trigger: ButtonEdges::new(),
            motor,
            ejector: LatchedSolenoid::new(ejector),
        })
    }

    pub fn state(&self) -> HatchDeployState {
        self.fsm.current_state()
    }

    pub fn is_zeroed(&self) -> bool {
        self.ctx.zeroed
    }

    pub fn target_position(&self) -> f64 {
        self.ctx.target_position
    }

    pub fn ejector_position(&self) -> Option<SolenoidPosition> {
        self.ejector.position()
    }

    /// Fire the ejector.
    pub fn eject(&mut self) {
        self.ejector.set(SolenoidPosition::Extend);
    }

    pub fn retract_ejector(&mut self) {
        self.ejector.set(SolenoidPosition::Retract);
    }

    /// Jump to `state` as if its guard had fired at `now`.  Used by
    /// autonomous routines, e.g. to hold at the collision angle.
    pub fn request_state(&mut self, state: HatchDeployState, now: f64) {
        self.ctx.inputs.now = now;
        self.fsm.force_transition(state, &mut self.ctx);
        self.motor.command(self.ctx.motor);
    }

    fn sample<Io: Clock + OperatorInput + ?Sized>(&mut self, io: &Io) -> (DeployInputs, bool, bool) {
        let driving_hatch = !io.driving_cargo();
        let inputs = DeployInputs {
            now: io.now_secs(),
            driving_hatch,
            hatch_pressed: self
                .hatch_button
                .update(io.button(Button::HatchDeploy) && driving_hatch),
            human_pressed: self
                .human_button
                .update(io.button(Button::HumanStation) && driving_hatch),
            defense: io.button(Button::Defense),
            faults: self.motor.limit_faults(),
        };
        let trigger = self
            .eject_trigger
            .update(io.axis_as_button(Axis::HatchShoot) && driving_hatch);
        (inputs, trigger.pressed, trigger.released)
    }
}

impl<Io, M, V> Loop<Io> for HatchDeploy<M, V>
where
    Io: Clock + OperatorInput + ?Sized,
    M: MotorPort,
    V: SolenoidPort,
{
    fn name(&self) -> &'static str {
        "HatchDeploy"
    }

    fn on_start(&mut self, io: &mut Io) {
        self.hatch_button.reset();
        self.human_button.reset();
        self.eject_trigger.reset();
        self.ctx.inputs = DeployInputs {
            now: io.now_secs(),
            ..DeployInputs::default()
        };
        self.ctx.motor = MotorCommand::STOP;
        self.fsm.start(&mut self.ctx);
        self.motor.force(self.ctx.motor);
        self.ejector.force(SolenoidPosition::Retract);
        if self.ctx.zeroed {
            info!("HatchDeploy: already zeroed, skipping calibration");
        }
    }

    fn on_loop(&mut self, io: &mut Io) {
        let (inputs, eject_pressed, eject_released) = self.sample(io);
        self.ctx.inputs = inputs;
        self.fsm.tick(&mut self.ctx);
        self.motor.command(self.ctx.motor);

        if eject_pressed {
            self.eject();
        } else if eject_released {
            self.retract_ejector();
        }
    }

    fn on_stop(&mut self, _io: &mut Io) {
        self.motor.force(MotorCommand::STOP);
        self.ejector.force(SolenoidPosition::Retract);
        info!("HatchDeploy: stopped in {}", self.fsm.current_name());
    }
}

impl<M: MotorPort, V: SolenoidPort> TelemetrySource for HatchDeploy<M, V> {
    fn log(&self, sink: &mut dyn TelemetrySink) {
        let faults = self.ctx.inputs.faults;
        sink.put("HatchDeploy/targetPosition", self.ctx.target_position.into());
        sink.put("HatchDeploy/state", self.fsm.current_name().into());
        sink.put("HatchDeploy/zeroed", self.ctx.zeroed.into());
        sink.put("HatchDeploy/fwdLimitSwitch", faults.forward_limit_switch.into());
        sink.put("HatchDeploy/revLimitSwitch", faults.reverse_limit_switch.into());
        sink.put("HatchDeploy/fwdSoftLimit", faults.forward_soft_limit.into());
        sink.put("HatchDeploy/revSoftLimit", faults.reverse_soft_limit.into());
        sink.put("HatchDeploy/motorCurrent", self.motor.output_current().into());
        sink.put("HatchDeploy/pidError", self.motor.closed_loop_error().into());
        sink.put("HatchDeploy/hatchAngle", self.motor.position().into());
        sink.put("HatchDeploy/drivingHatch", self.ctx.inputs.driving_hatch.into());
        let ejector = self.ejector.position().unwrap_or(SolenoidPosition::Off);
        sink.put("HatchDeploy/ejector", ejector.name().into());
    }
}
