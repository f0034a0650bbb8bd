//! Hatch grabber: two double-acting valves, one for the grabber fingers
//! and one for the arm that pushes them out past the bumper.

pub mod context;
pub mod states;

use log::info;

use crate::app::ports::{Axis, Button, Clock, OperatorInput, SolenoidPort, SolenoidPosition, TelemetrySink};
use crate::app::telemetry::TelemetrySource;
use crate::config::HatchConfig;
use crate::control::edge::ButtonEdges;
use crate::drivers::solenoid::LatchedSolenoid;
use crate::error::Result;
use crate::fsm::{Fsm, StateSet};
use crate::looper::Loop;

use context::{ARM_RETRACTED, HatchContext, HatchInputs};
pub use states::HatchState;

pub struct Hatch<G = Box<dyn SolenoidPort>, E = Box<dyn SolenoidPort>>
where
    G: SolenoidPort,
    E: SolenoidPort,
{
    fsm: Fsm<HatchState, HatchContext, { HatchState::COUNT }>,
    ctx: HatchContext,
    grab_edges: ButtonEdges,
    extend_edges: ButtonEdges,
    grabber: LatchedSolenoid<G>,
    extender: LatchedSolenoid<E>,
}

impl<G: SolenoidPort, E: SolenoidPort> Hatch<G, E> {
    /// Fails on an invalid config or a malformed state table.
    pub fn new(config: HatchConfig, grabber: G, extender: E) -> Result<Self> {
        config.validate()?;
        let fsm = Fsm::new("Hatch", states::build_state_table(), HatchState::Init)?
            .with_preempt(states::preempt);
        Ok(Self {
            fsm,
            ctx: HatchContext::new(config),
            grab_edges: ButtonEdges::new(),
            extend_edges: ButtonEdges::new(),
            grabber: LatchedSolenoid::new(grabber),
            extender: LatchedSolenoid::new(extender),
        })
    }

    pub fn state(&self) -> HatchState {
        self.fsm.current_state()
    }

    pub fn grabber_position(&self) -> Option<SolenoidPosition> {
        self.grabber.position()
    }

    pub fn extender_position(&self) -> Option<SolenoidPosition> {
        self.extender.position()
    }

    /// Pull the arm in now.  Holds until the next state entry commands
    /// the arm again.
    pub fn retract(&mut self) {
        self.ctx.commands.extender = ARM_RETRACTED;
        self.extender.set(ARM_RETRACTED);
    }

    /// Jump to `state` as if its guard had fired at `now`.
    pub fn request_state(&mut self, state: HatchState, now: f64) {
        self.ctx.inputs.now = now;
        self.fsm.force_transition(state, &mut self.ctx);
        self.apply();
    }

    fn sample<Io: Clock + OperatorInput + ?Sized>(&mut self, io: &Io) -> HatchInputs {
        let driving_hatch = !io.driving_cargo();
        HatchInputs {
            now: io.now_secs(),
            driving_hatch,
            grab: self
                .grab_edges
                .update(io.button(Button::HatchDeploy) && driving_hatch),
            extend: self
                .extend_edges
                .update(io.axis_as_button(Axis::HatchShoot) && driving_hatch),
            defense: io.button(Button::Defense),
        }
    }

    fn apply(&mut self) {
        self.grabber.set(self.ctx.commands.grabber);
        self.extender.set(self.ctx.commands.extender);
    }
}

impl<Io, G, E> Loop<Io> for Hatch<G, E>
where
    Io: Clock + OperatorInput + ?Sized,
    G: SolenoidPort,
    E: SolenoidPort,
{
    fn name(&self) -> &'static str {
        "Hatch"
    }

    fn on_start(&mut self, io: &mut Io) {
        self.grab_edges.reset();
        self.extend_edges.reset();
        self.ctx.inputs = HatchInputs {
            now: io.now_secs(),
            ..HatchInputs::default()
        };
        self.fsm.start(&mut self.ctx);
        self.grabber.force(self.ctx.commands.grabber);
        self.extender.force(self.ctx.commands.extender);
    }

    fn on_loop(&mut self, io: &mut Io) {
        self.ctx.inputs = self.sample(io);
        self.fsm.tick(&mut self.ctx);
        self.apply();
    }

    fn on_stop(&mut self, _io: &mut Io) {
        self.grabber.force(SolenoidPosition::Off);
        self.extender.force(SolenoidPosition::Off);
        info!("Hatch: stopped in {}", self.fsm.current_name());
    }
}

impl<G: SolenoidPort, E: SolenoidPort> TelemetrySource for Hatch<G, E> {
    fn log(&self, sink: &mut dyn TelemetrySink) {
        sink.put("Hatch/state", self.fsm.current_name().into());
        sink.put("Hatch/grabber", self.ctx.commands.grabber.name().into());
        sink.put("Hatch/extender", self.ctx.commands.extender.name().into());
        sink.put("Hatch/drivingHatch", self.ctx.inputs.driving_hatch.into());
    }
}
