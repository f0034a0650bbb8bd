//! Climber state handlers and table builder.
//!
//! ```text
//!  ARMS_ON_PLATFORM_L3 ──[start press]──▶ ARMS_ON_PLATFORM_L2
//!  ARMS_ON_PLATFORM_L2 ──[start press]──▶ ARMS_ON_PLATFORM_L3
//!  ARMS_ON_PLATFORM_L3 | L2 ──[extend held]──▶ CLIMB_L3
//!
//!  CLIMB_L3 ──[arm at ground]──▶ DRIVE_ONTO_PLATFORM
//!           ──[retract held]──▶ RETRACT_CYLINDERS
//!           ──[retract dwell]──▶ LAST_NUDGE
//!           ──[nudge]──▶ FINISHED
//! ```
//!
//! CLIMB_L3 is the only closed-loop state: the tilt PID levels the
//! chassis by driving the cargo arm while the cylinders lift the back.

use log::debug;

use super::context::{ClimberContext, DriveCommand};
use crate::app::ports::{ArmPosition, SolenoidPosition};
use crate::control::timer::TimedWait;
use crate::fsm::{StateDescriptor, StateSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClimberState {
    ArmsOnPlatformL3 = 0,
    ArmsOnPlatformL2 = 1,
    ClimbL3 = 2,
    DriveOntoPlatform = 3,
    RetractCylinders = 4,
    LastNudge = 5,
    Finished = 6,
}

impl StateSet for ClimberState {
    const COUNT: usize = 7;

    fn index(self) -> usize {
        self as usize
    }
}

impl ClimberState {
    pub const ALL: [ClimberState; ClimberState::COUNT] = [
        Self::ArmsOnPlatformL3,
        Self::ArmsOnPlatformL2,
        Self::ClimbL3,
        Self::DriveOntoPlatform,
        Self::RetractCylinders,
        Self::LastNudge,
        Self::Finished,
    ];
}

pub fn build_state_table() -> [StateDescriptor<ClimberState, ClimberContext>; ClimberState::COUNT] {
    [
        StateDescriptor {
            id: ClimberState::ArmsOnPlatformL3,
            name: "ArmsOnPlatformL3",
            on_enter: None,
            on_exit: None,
            on_update: arms_l3_update,
        },
        StateDescriptor {
            id: ClimberState::ArmsOnPlatformL2,
            name: "ArmsOnPlatformL2",
            on_enter: None,
            on_exit: None,
            on_update: arms_l2_update,
        },
        StateDescriptor {
            id: ClimberState::ClimbL3,
            name: "ClimbL3",
            on_enter: Some(reset_tilt_pid),
            on_exit: Some(reset_tilt_pid),
            on_update: climb_update,
        },
        StateDescriptor {
            id: ClimberState::DriveOntoPlatform,
            name: "DriveOntoPlatform",
            on_enter: None,
            on_exit: None,
            on_update: drive_onto_update,
        },
        StateDescriptor {
            id: ClimberState::RetractCylinders,
            name: "RetractCylinders",
            on_enter: Some(retract_enter),
            on_exit: None,
            on_update: retract_update,
        },
        StateDescriptor {
            id: ClimberState::LastNudge,
            name: "LastNudge",
            on_enter: Some(last_nudge_enter),
            on_exit: None,
            on_update: last_nudge_update,
        },
        StateDescriptor {
            id: ClimberState::Finished,
            name: "Finished",
            on_enter: Some(finished_enter),
            on_exit: None,
            on_update: finished_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Arms on the platform edge, waiting for the driver
// ═══════════════════════════════════════════════════════════════════════════

fn arms_l3_update(ctx: &mut ClimberContext) -> Option<ClimberState> {
    ctx.drive_forward();
    ctx.commands.arm_target = Some(ArmPosition::HabLevel3);

    if ctx.inputs.extend_button {
        Some(ClimberState::ClimbL3)
    } else if ctx.inputs.climb_start_pressed {
        Some(ClimberState::ArmsOnPlatformL2)
    } else {
        None
    }
}

fn arms_l2_update(ctx: &mut ClimberContext) -> Option<ClimberState> {
    ctx.commands.arm_target = Some(ArmPosition::HabLevel2);

    if ctx.inputs.extend_button {
        Some(ClimberState::ClimbL3)
    } else if ctx.inputs.climb_start_pressed {
        // Third press backs out: arm in, start over.
        ctx.commands.arm_target = Some(ArmPosition::Retracted);
        Some(ClimberState::ArmsOnPlatformL3)
    } else {
        None
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CLIMB_L3: cylinders lift, arm levels the chassis
// ═══════════════════════════════════════════════════════════════════════════

fn reset_tilt_pid(ctx: &mut ClimberContext) {
    ctx.tilt_pid.reset();
}

fn climb_update(ctx: &mut ClimberContext) -> Option<ClimberState> {
    ctx.commands.climb_motor = ctx.config.climb_motor_extending_percent_output;
    ctx.commands.cylinders = SolenoidPosition::Extend;

    let correction = ctx.tilt_pid.update(-ctx.inputs.pitch_deg);
    debug!(
        "Climber: tilt error {:.3} rate {:.3} integral {:.3} -> {:.3}",
        ctx.tilt_pid.error(),
        ctx.tilt_pid.error_rate(),
        ctx.tilt_pid.integral(),
        correction
    );
    ctx.commands.arm_percent = Some(correction);

    if ctx.inputs.arm_angle_deg <= ctx.config.arm_ground_angle_deg {
        ctx.commands.arm_percent = Some(0.0);
        return Some(ClimberState::DriveOntoPlatform);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  DRIVE_ONTO_PLATFORM: arm pushes past its soft limit to the hard stop
// ═══════════════════════════════════════════════════════════════════════════

fn drive_onto_update(ctx: &mut ClimberContext) -> Option<ClimberState> {
    ctx.drive_forward();
    ctx.commands.climb_motor = ctx.config.climb_motor_at_top_percent_output;
    ctx.commands.arm_soft_limits = Some(false);
    ctx.commands.arm_target = Some(ArmPosition::Pushup);

    ctx.inputs
        .retract_button
        .then_some(ClimberState::RetractCylinders)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RETRACT_CYLINDERS / LAST_NUDGE: both waits anchored at the retract press
// ═══════════════════════════════════════════════════════════════════════════

fn retract_enter(ctx: &mut ClimberContext) {
    ctx.retract_started = ctx.inputs.now;
    ctx.wait = TimedWait::new(ctx.retract_started, ctx.config.retract_dwell_secs);
}

fn retract_update(ctx: &mut ClimberContext) -> Option<ClimberState> {
    ctx.commands.drive = Some(DriveCommand::Coast);
    ctx.commands.climb_motor = 0.0;
    ctx.commands.arm_target = Some(ArmPosition::Retracted);
    ctx.commands.cylinders = SolenoidPosition::Retract;

    ctx.wait
        .elapsed(ctx.inputs.now)
        .then_some(ClimberState::LastNudge)
}

fn last_nudge_enter(ctx: &mut ClimberContext) {
    ctx.wait = TimedWait::new(
        ctx.retract_started,
        ctx.config.retract_dwell_secs + ctx.config.last_nudge_secs,
    );
}

fn last_nudge_update(ctx: &mut ClimberContext) -> Option<ClimberState> {
    ctx.drive_forward();
    ctx.wait
        .elapsed(ctx.inputs.now)
        .then_some(ClimberState::Finished)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FINISHED
// ═══════════════════════════════════════════════════════════════════════════

fn finished_enter(ctx: &mut ClimberContext) {
    ctx.commands.drive = Some(DriveCommand::Coast);
}

fn finished_update(_ctx: &mut ClimberContext) -> Option<ClimberState> {
    None
}
