//! Climber scenarios: climb-mode gating, the L2 toggle, and a full
//! level-3 climb with its anchored retract and nudge timings.

use hatchbot::app::ports::{ArmPosition, Button, NeutralMode, SolenoidPosition};
use hatchbot::config::{PidGains, RobotConfig};
use hatchbot::subsystems::climber::ClimberState;

use crate::mock_hw::{IoCall, MotorWrite, Rig};

fn climbing_rig() -> Rig {
    let mut rig = Rig::started();
    rig.io.climb_mode = true;
    rig
}

/// From the waiting state into ClimbL3 at 0.25.
fn begin_climb(rig: &mut Rig) {
    rig.tick_at(0.0);
    rig.io.press(Button::ClimbExtend);
    rig.tick_at(0.25);
    assert_eq!(rig.robot.climber().state(), ClimberState::ClimbL3);
}

#[test]
fn start_commands_safe_idle() {
    let rig = Rig::started();
    assert_eq!(rig.robot.climber().state(), ClimberState::ArmsOnPlatformL3);
    assert_eq!(
        rig.climb_motor.state.borrow().writes,
        [
            MotorWrite::Inverted(false),
            MotorWrite::Neutral(NeutralMode::Brake),
            MotorWrite::Percent(0.0),
        ]
    );
    assert_eq!(rig.cylinders.last(), Some(SolenoidPosition::Retract));
    assert!(rig.io.calls.is_empty());
}

#[test]
fn climb_mode_off_issues_nothing() {
    let mut rig = Rig::started();
    rig.io.press(Button::ClimbExtend);
    rig.io.press(Button::ClimbRetract);
    rig.io.climb_start = true;
    rig.io.arm_angle_deg = 0.0;
    rig.io.pitch_deg = 3.5;

    for i in 0..100u32 {
        rig.tick_at(f64::from(i) * 0.01);
    }

    assert_eq!(rig.robot.climber().state(), ClimberState::ArmsOnPlatformL3);
    assert_eq!(rig.climb_motor.count(), 3);
    assert_eq!(rig.cylinders.count(), 1);
    assert!(rig.io.calls.is_empty());
    // Tilt is still sampled for the dashboard.
    assert_eq!(rig.robot.climber().tilt_angle_deg(), 3.5);
}

#[test]
fn waiting_at_level_three_holds_the_arm_and_drives_in() {
    let mut rig = climbing_rig();
    rig.tick_at(0.0);
    assert_eq!(rig.io.last_drive(), Some(IoCall::Drive(0.2, 0.2)));
    assert_eq!(rig.io.last_arm_target(), Some(ArmPosition::HabLevel3));
    assert_eq!(rig.robot.climber().state(), ClimberState::ArmsOnPlatformL3);
}

#[test]
fn start_presses_toggle_level_two() {
    let mut rig = climbing_rig();

    rig.io.climb_start = true;
    rig.tick_at(0.0);
    assert_eq!(rig.robot.climber().state(), ClimberState::ArmsOnPlatformL2);

    rig.io.climb_start = false;
    rig.tick_at(0.25);
    assert_eq!(rig.io.last_arm_target(), Some(ArmPosition::HabLevel2));
    assert_eq!(rig.robot.climber().state(), ClimberState::ArmsOnPlatformL2);

    rig.io.climb_start = true;
    rig.tick_at(0.5);
    assert_eq!(rig.io.last_arm_target(), Some(ArmPosition::Retracted));
    assert_eq!(rig.robot.climber().state(), ClimberState::ArmsOnPlatformL3);
}

#[test]
fn extend_beats_a_start_press() {
    let mut rig = climbing_rig();
    rig.io.climb_start = true;
    rig.io.press(Button::ClimbExtend);
    rig.tick_at(0.0);
    assert_eq!(rig.robot.climber().state(), ClimberState::ClimbL3);
}

#[test]
fn extend_from_level_two_climbs() {
    let mut rig = climbing_rig();
    rig.io.climb_start = true;
    rig.tick_at(0.0);
    rig.io.climb_start = false;
    rig.io.press(Button::ClimbExtend);
    rig.tick_at(0.25);
    assert_eq!(rig.robot.climber().state(), ClimberState::ClimbL3);
}

#[test]
fn climb_levels_the_chassis_with_the_arm() {
    let mut rig = climbing_rig();
    rig.io.pitch_deg = 5.0;
    begin_climb(&mut rig);

    rig.tick_at(0.5);
    assert_eq!(rig.climb_motor.last(), Some(MotorWrite::Percent(0.2)));
    assert_eq!(rig.cylinders.last(), Some(SolenoidPosition::Extend));

    // Nose up means a negative error and the arm pushes down.
    let correction = rig.io.last_arm_percent().unwrap();
    assert!((correction + 0.05).abs() < 1e-12);
    assert!((rig.robot.climber().pid_output() - correction).abs() < 1e-12);
}

#[test]
fn full_level_three_climb() {
    let mut rig = climbing_rig();
    begin_climb(&mut rig);
    rig.tick_at(0.5);

    // Arm reaches the ground: stop pushing, drive onto the platform.
    rig.io.release(Button::ClimbExtend);
    rig.io.arm_angle_deg = 0.0;
    rig.tick_at(0.75);
    assert_eq!(
        rig.robot.climber().state(),
        ClimberState::DriveOntoPlatform
    );
    assert_eq!(rig.io.last_arm_percent(), Some(0.0));
    assert_eq!(rig.robot.climber().pid_output(), 0.0);

    rig.tick_at(1.0);
    assert_eq!(rig.io.last_drive(), Some(IoCall::Drive(0.2, 0.2)));
    assert_eq!(rig.climb_motor.last(), Some(MotorWrite::Percent(0.4)));
    assert!(rig.io.calls.contains(&IoCall::ArmSoftLimits(false)));
    assert_eq!(rig.io.last_arm_target(), Some(ArmPosition::Pushup));

    // Retract pressed at 1.25: the waits run from here.
    rig.io.press(Button::ClimbRetract);
    rig.tick_at(1.25);
    assert_eq!(rig.robot.climber().state(), ClimberState::RetractCylinders);
    rig.io.release(Button::ClimbRetract);

    rig.tick_at(1.5);
    assert_eq!(rig.io.last_drive(), Some(IoCall::Coast));
    assert_eq!(rig.climb_motor.last(), Some(MotorWrite::Percent(0.0)));
    assert_eq!(rig.io.last_arm_target(), Some(ArmPosition::Retracted));
    assert_eq!(rig.cylinders.last(), Some(SolenoidPosition::Retract));

    rig.tick_at(3.0);
    assert_eq!(rig.robot.climber().state(), ClimberState::RetractCylinders);

    rig.tick_at(3.25);
    assert_eq!(rig.robot.climber().state(), ClimberState::LastNudge);

    rig.tick_at(3.5);
    assert_eq!(rig.io.last_drive(), Some(IoCall::Drive(0.2, 0.2)));
    assert_eq!(rig.robot.climber().state(), ClimberState::LastNudge);

    rig.tick_at(3.75);
    assert_eq!(rig.robot.climber().state(), ClimberState::Finished);
    assert_eq!(rig.io.last_call(), Some(IoCall::Coast));

    // Finished is quiet.
    let calls = rig.io.calls.len();
    rig.tick_at(4.0);
    rig.tick_at(4.25);
    assert_eq!(rig.io.calls.len(), calls);
    assert_eq!(rig.robot.climber().state(), ClimberState::Finished);
}

#[test]
fn turning_climb_mode_off_mid_climb_freezes_everything() {
    let mut rig = climbing_rig();
    begin_climb(&mut rig);
    rig.tick_at(0.5);

    let (calls, motor, cylinders) = (
        rig.io.calls.len(),
        rig.climb_motor.count(),
        rig.cylinders.count(),
    );
    rig.io.climb_mode = false;
    rig.io.arm_angle_deg = 0.0;
    for i in 0..20u32 {
        rig.tick_at(0.75 + f64::from(i) * 0.25);
    }

    assert_eq!(rig.robot.climber().state(), ClimberState::ClimbL3);
    assert_eq!(rig.io.calls.len(), calls);
    assert_eq!(rig.climb_motor.count(), motor);
    assert_eq!(rig.cylinders.count(), cylinders);
}

/// Climb-mode rig whose tilt PID has a derivative term.
fn damped_climbing_rig() -> Rig {
    let mut config = RobotConfig::default();
    config.climber.tilt_gains = PidGains::new(0.01, 0.0, 0.001);
    let mut rig = Rig::with_config(config);
    rig.robot.start(&mut rig.io).unwrap();
    rig.io.climb_mode = true;
    rig
}

#[test]
fn pausing_climb_mode_clears_the_tilt_pid() {
    let mut fresh = damped_climbing_rig();
    fresh.io.pitch_deg = 5.0;
    begin_climb(&mut fresh);
    fresh.tick_at(0.5);
    let first_correction = fresh.io.last_arm_percent().unwrap();

    let mut rig = damped_climbing_rig();
    rig.io.pitch_deg = 5.0;
    begin_climb(&mut rig);
    rig.tick_at(0.5);
    rig.io.pitch_deg = 8.0;
    rig.tick_at(0.75);
    assert!(rig.robot.climber().integral_error() < 0.0);

    rig.io.climb_mode = false;
    rig.tick_at(1.0);
    assert_eq!(rig.robot.climber().integral_error(), 0.0);
    assert_eq!(rig.robot.climber().pid_output(), 0.0);

    // Back on: no stale error feeds the derivative.
    rig.io.climb_mode = true;
    rig.io.pitch_deg = 5.0;
    rig.tick_at(1.25);
    assert_eq!(rig.robot.climber().state(), ClimberState::ClimbL3);
    let correction = rig.io.last_arm_percent().unwrap();
    assert!((correction - first_correction).abs() < 1e-12);
}

#[test]
fn climb_waits_fire_on_decimal_ticks() {
    let mut rig = climbing_rig();
    rig.tick_at(0.0);
    rig.io.press(Button::ClimbExtend);
    rig.tick_at(0.03);
    assert_eq!(rig.robot.climber().state(), ClimberState::ClimbL3);
    rig.tick_at(0.04);

    rig.io.release(Button::ClimbExtend);
    rig.io.arm_angle_deg = 0.0;
    rig.tick_at(0.05);
    assert_eq!(
        rig.robot.climber().state(),
        ClimberState::DriveOntoPlatform
    );

    rig.io.press(Button::ClimbRetract);
    rig.tick_at(0.07);
    assert_eq!(rig.robot.climber().state(), ClimberState::RetractCylinders);
    rig.io.release(Button::ClimbRetract);

    rig.tick_at(2.06);
    assert_eq!(rig.robot.climber().state(), ClimberState::RetractCylinders);
    rig.tick_at(2.07);
    assert_eq!(rig.robot.climber().state(), ClimberState::LastNudge);

    rig.tick_at(2.56);
    assert_eq!(rig.robot.climber().state(), ClimberState::LastNudge);
    rig.tick_at(2.57);
    assert_eq!(rig.robot.climber().state(), ClimberState::Finished);
}

#[test]
fn stop_vents_the_cylinders_and_restart_resets() {
    let mut rig = climbing_rig();
    begin_climb(&mut rig);
    rig.tick_at(0.5);

    rig.robot.stop(&mut rig.io).unwrap();
    assert_eq!(rig.cylinders.last(), Some(SolenoidPosition::Off));
    assert_eq!(rig.climb_motor.last(), Some(MotorWrite::Percent(0.0)));

    rig.robot.start(&mut rig.io).unwrap();
    assert_eq!(rig.robot.climber().state(), ClimberState::ArmsOnPlatformL3);
    assert_eq!(rig.cylinders.last(), Some(SolenoidPosition::Retract));
    assert_eq!(rig.robot.climber().integral_error(), 0.0);
}

#[test]
fn start_over_returns_to_the_first_step() {
    let mut rig = climbing_rig();
    begin_climb(&mut rig);
    rig.robot.climber_mut().start_over();
    assert_eq!(rig.robot.climber().state(), ClimberState::ArmsOnPlatformL3);
}
