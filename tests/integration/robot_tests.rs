//! Whole-robot lifecycle, configuration and telemetry.

use hatchbot::app::ports::Button;
use hatchbot::app::robot::{Robot, RobotHardware};
use hatchbot::app::telemetry::{TelemetrySnapshot, TelemetryValue};
use hatchbot::config::RobotConfig;
use hatchbot::subsystems::climber::ClimberState;
use hatchbot::subsystems::hatch::HatchState;
use hatchbot::subsystems::hatch_deploy::HatchDeployState;
use hatchbot::{ConfigError, Error, LifecycleError};

use crate::mock_hw::{MockMotor, MockSolenoid, Rig};

#[test]
fn every_subsystem_starts_in_its_initial_state() {
    let rig = Rig::started();
    assert!(rig.robot.is_running());
    assert_eq!(rig.robot.hatch().state(), HatchState::Init);
    assert_eq!(rig.robot.hatch_deploy().state(), HatchDeployState::Init);
    assert_eq!(
        rig.robot.climber().state(),
        ClimberState::ArmsOnPlatformL3
    );
}

#[test]
fn tick_before_start_is_rejected_without_side_effects() {
    let mut rig = Rig::new();
    let writes = rig.grabber.count();
    assert_eq!(
        rig.robot.tick(&mut rig.io),
        Err(Error::Lifecycle(LifecycleError::NotRunning))
    );
    assert_eq!(rig.grabber.count(), writes);
}

#[test]
fn double_start_and_double_stop_are_rejected() {
    let mut rig = Rig::started();
    assert_eq!(
        rig.robot.start(&mut rig.io),
        Err(Error::Lifecycle(LifecycleError::AlreadyRunning))
    );
    rig.robot.stop(&mut rig.io).unwrap();
    assert_eq!(
        rig.robot.stop(&mut rig.io),
        Err(Error::Lifecycle(LifecycleError::NotRunning))
    );
    assert!(rig.robot.tick(&mut rig.io).is_err());
}

#[test]
fn invalid_config_refuses_to_build() {
    let config = RobotConfig {
        loop_period_secs: 0.0,
        ..RobotConfig::default()
    };
    let hw = RobotHardware {
        hatch_grabber: Box::new(MockSolenoid::default()),
        hatch_extender: Box::new(MockSolenoid::default()),
        hatch_deploy_motor: Box::new(MockMotor::default()),
        hatch_ejector: Box::new(MockSolenoid::default()),
        climb_motor: Box::new(MockMotor::default()),
        climb_cylinders: Box::new(MockSolenoid::default()),
    };
    let result = Robot::new(config, hw);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::Invalid("loop_period_secs")))
    ));
}

#[test]
fn json_overrides_reach_the_subsystems() {
    let config = RobotConfig::from_json(r#"{ "hatch": { "grab_delay_secs": 0.5 } }"#).unwrap();
    let mut rig = Rig::with_config(config);
    rig.robot.start(&mut rig.io).unwrap();
    rig.tick_at(0.0);

    rig.io.press(Button::HatchDeploy);
    rig.tick_at(1.0);
    rig.io.release(Button::HatchDeploy);
    rig.tick_at(1.5);
    rig.tick_at(1.75);
    assert_eq!(rig.robot.hatch().state(), HatchState::AcquireDelay);
    rig.tick_at(2.0);
    assert_eq!(rig.robot.hatch().state(), HatchState::HoldHatch);
}

#[test]
fn telemetry_covers_every_subsystem() {
    let mut rig = Rig::primed();
    rig.tick_at(0.01);

    let mut snap = TelemetrySnapshot::new();
    rig.robot.log(&mut snap);

    assert_eq!(snap.get("Hatch/state"), Some(TelemetryValue::Text("Init")));
    assert_eq!(
        snap.get("HatchDeploy/state"),
        Some(TelemetryValue::Text("Init"))
    );
    assert_eq!(
        snap.get("HatchDeploy/zeroed"),
        Some(TelemetryValue::Bool(false))
    );
    assert_eq!(
        snap.get("Climber/state"),
        Some(TelemetryValue::Text("ArmsOnPlatformL3"))
    );
    assert_eq!(snap.get("Looper/ticks"), Some(TelemetryValue::Number(2.0)));
    assert_eq!(snap.dropped(), 0);
    assert!(snap.to_json().unwrap().contains("\"Climber/pidOutput\""));
}

#[test]
fn logging_does_not_change_control() {
    let mut logged = Rig::primed();
    let mut quiet = Rig::primed();
    let mut snap = TelemetrySnapshot::new();

    for rig in [&mut logged, &mut quiet] {
        rig.io.press(Button::HatchDeploy);
        rig.tick_at(0.5);
    }
    logged.robot.log(&mut snap);
    logged.robot.log(&mut snap);
    for rig in [&mut logged, &mut quiet] {
        rig.io.release(Button::HatchDeploy);
        rig.tick_at(1.0);
    }

    assert_eq!(logged.robot.hatch().state(), quiet.robot.hatch().state());
    assert_eq!(*logged.grabber.writes.borrow(), *quiet.grabber.writes.borrow());
}

#[test]
fn long_gaps_count_as_overruns() {
    let mut rig = Rig::started();
    for now in [0.0, 0.01, 0.02, 0.1, 0.11] {
        rig.tick_at(now);
    }
    let stats = rig.robot.stats();
    assert_eq!(stats.ticks, 5);
    assert_eq!(stats.overruns, 1);
}
