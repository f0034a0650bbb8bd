//! Mock hardware for integration tests.
//!
//! Owned actuators (valves, motor controllers) record every write into
//! a shared log the test keeps a handle to.  [`MockIo`] stands in for
//! the shared collaborators: scripted time, buttons, IMU and cargo arm,
//! and it records every drive-base and arm command.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use hatchbot::app::ports::{
    ArmPort, ArmPosition, Axis, Button, Clock, DrivePort, ImuPort, LimitFaults, MotorPort,
    NeutralMode, OperatorInput, SolenoidPort, SolenoidPosition,
};
use hatchbot::app::robot::{Robot, RobotHardware};
use hatchbot::config::RobotConfig;

pub type Shared<T> = Rc<RefCell<T>>;

// ── Valves ────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSolenoid {
    pub writes: Shared<Vec<SolenoidPosition>>,
}

#[allow(dead_code)]
impl MockSolenoid {
    pub fn last(&self) -> Option<SolenoidPosition> {
        self.writes.borrow().last().copied()
    }

    pub fn count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl SolenoidPort for MockSolenoid {
    fn set_position(&mut self, position: SolenoidPosition) {
        self.writes.borrow_mut().push(position);
    }
}

// ── Motor controllers ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorWrite {
    Percent(f64),
    Target(f64),
    Neutral(NeutralMode),
    Inverted(bool),
}

#[derive(Default)]
pub struct MotorState {
    pub writes: Vec<MotorWrite>,
    pub faults: LimitFaults,
    pub position: f64,
}

#[derive(Clone, Default)]
pub struct MockMotor {
    pub state: Shared<MotorState>,
}

#[allow(dead_code)]
impl MockMotor {
    pub fn last(&self) -> Option<MotorWrite> {
        self.state.borrow().writes.last().copied()
    }

    pub fn count(&self) -> usize {
        self.state.borrow().writes.len()
    }

    pub fn set_reverse_limit(&self, hit: bool) {
        self.state.borrow_mut().faults.reverse_limit_switch = hit;
    }
}

impl MotorPort for MockMotor {
    fn set_percent_output(&mut self, output: f64) {
        self.state.borrow_mut().writes.push(MotorWrite::Percent(output));
    }
    fn set_closed_loop_target(&mut self, target: f64) {
        self.state.borrow_mut().writes.push(MotorWrite::Target(target));
    }
    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        self.state.borrow_mut().writes.push(MotorWrite::Neutral(mode));
    }
    fn set_inverted(&mut self, inverted: bool) {
        self.state.borrow_mut().writes.push(MotorWrite::Inverted(inverted));
    }
    fn limit_faults(&self) -> LimitFaults {
        self.state.borrow().faults
    }
    fn position(&self) -> f64 {
        self.state.borrow().position
    }
    fn velocity(&self) -> f64 {
        0.0
    }
    fn output_current(&self) -> f64 {
        0.0
    }
    fn closed_loop_error(&self) -> f64 {
        0.0
    }
}

// ── Shared collaborators ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IoCall {
    Drive(f64, f64),
    Coast,
    ArmTarget(ArmPosition),
    ArmPercent(f64),
    ArmSoftLimits(bool),
}

#[derive(Default)]
pub struct MockIo {
    pub now: f64,
    pub held: HashSet<Button>,
    pub hatch_shoot: bool,
    pub driving_cargo: bool,
    pub pitch_deg: f64,
    pub arm_angle_deg: f64,
    pub climb_mode: bool,
    pub climb_start: bool,
    pub calls: Vec<IoCall>,
}

#[allow(dead_code)]
impl MockIo {
    pub fn new() -> Self {
        Self {
            // Arm starts up off the ground so the climb does not finish
            // on its first tick.
            arm_angle_deg: 90.0,
            ..Self::default()
        }
    }

    pub fn press(&mut self, button: Button) {
        self.held.insert(button);
    }

    pub fn release(&mut self, button: Button) {
        self.held.remove(&button);
    }

    pub fn last_call(&self) -> Option<IoCall> {
        self.calls.last().copied()
    }

    pub fn last_drive(&self) -> Option<IoCall> {
        self.calls
            .iter()
            .rev()
            .find(|c| matches!(c, IoCall::Drive(..) | IoCall::Coast))
            .copied()
    }

    pub fn last_arm_target(&self) -> Option<ArmPosition> {
        self.calls.iter().rev().find_map(|c| match c {
            IoCall::ArmTarget(p) => Some(*p),
            _ => None,
        })
    }

    pub fn last_arm_percent(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|c| match c {
            IoCall::ArmPercent(p) => Some(*p),
            _ => None,
        })
    }
}

impl Clock for MockIo {
    fn now_secs(&self) -> f64 {
        self.now
    }
}

impl OperatorInput for MockIo {
    fn button(&self, button: Button) -> bool {
        self.held.contains(&button)
    }
    fn axis_as_button(&self, axis: Axis) -> bool {
        match axis {
            Axis::HatchShoot => self.hatch_shoot,
        }
    }
    fn driving_cargo(&self) -> bool {
        self.driving_cargo
    }
}

impl ImuPort for MockIo {
    fn pitch_deg(&self) -> f64 {
        self.pitch_deg
    }
}

impl DrivePort for MockIo {
    fn set_open_loop(&mut self, left: f64, right: f64) {
        self.calls.push(IoCall::Drive(left, right));
    }
    fn coast(&mut self) {
        self.calls.push(IoCall::Coast);
    }
}

impl ArmPort for MockIo {
    fn climb_mode_enabled(&self) -> bool {
        self.climb_mode
    }
    fn climb_start_pressed(&self) -> bool {
        self.climb_start
    }
    fn arm_angle_deg(&self) -> f64 {
        self.arm_angle_deg
    }
    fn set_arm_target(&mut self, position: ArmPosition) {
        self.calls.push(IoCall::ArmTarget(position));
    }
    fn set_arm_percent_output(&mut self, output: f64) {
        self.calls.push(IoCall::ArmPercent(output));
    }
    fn set_arm_soft_limits(&mut self, enabled: bool) {
        self.calls.push(IoCall::ArmSoftLimits(enabled));
    }
}

// ── Full robot rig ────────────────────────────────────────────

/// A [`Robot`] on mock hardware, with handles to every actuator.
pub struct Rig {
    pub robot: Robot,
    pub io: MockIo,
    pub grabber: MockSolenoid,
    pub extender: MockSolenoid,
    pub deploy_motor: MockMotor,
    pub ejector: MockSolenoid,
    pub climb_motor: MockMotor,
    pub cylinders: MockSolenoid,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(RobotConfig::default())
    }

    pub fn with_config(config: RobotConfig) -> Self {
        let grabber = MockSolenoid::default();
        let extender = MockSolenoid::default();
        let deploy_motor = MockMotor::default();
        let ejector = MockSolenoid::default();
        let climb_motor = MockMotor::default();
        let cylinders = MockSolenoid::default();
        let hw = RobotHardware {
            hatch_grabber: Box::new(grabber.clone()),
            hatch_extender: Box::new(extender.clone()),
            hatch_deploy_motor: Box::new(deploy_motor.clone()),
            hatch_ejector: Box::new(ejector.clone()),
            climb_motor: Box::new(climb_motor.clone()),
            climb_cylinders: Box::new(cylinders.clone()),
        };
        let robot = Robot::new(config, hw).unwrap();
        Self {
            robot,
            io: MockIo::new(),
            grabber,
            extender,
            deploy_motor,
            ejector,
            climb_motor,
            cylinders,
        }
    }

    /// Build and start at t = 0.
    pub fn started() -> Self {
        let mut rig = Self::new();
        rig.robot.start(&mut rig.io).unwrap();
        rig
    }

    /// Build, start and run one input-free tick at t = 0 so every edge
    /// detector has seen a released level.
    pub fn primed() -> Self {
        let mut rig = Self::started();
        rig.tick_at(0.0);
        rig
    }

    pub fn tick(&mut self) {
        self.robot.tick(&mut self.io).unwrap();
    }

    /// Set the clock to `now`, then tick once.
    pub fn tick_at(&mut self, now: f64) {
        self.io.now = now;
        self.tick();
    }
}
