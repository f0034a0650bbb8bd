//! Hatch deploy arm state table.
//!
//! ```text
//!  INIT ──[zeroed or reverse limit]──▶ TO_BUMPER
//!
//!  TO_BUMPER ──[defense held]──▶ DEFENSE ──[hatch press]──▶ TO_BUMPER
//!  TO_BUMPER ──[hatch press]───▶ GROUND ──[ground dwell]──▶ TO_BUMPER
//!  TO_BUMPER ──[human press]───▶ HUMAN_STATION ──[human dwell]──▶ TO_BUMPER
//!
//!  AUTO_COLLISION (on request) ──[defense held]──▶ DEFENSE
//!                              ──[hatch press]───▶ GROUND
//! ```
//!
//! Positions are closed-loop targets executed by the motor controller.
//! Only INIT runs open loop.

use super::context::DeployContext;
use crate::control::timer::TimedWait;
use crate::drivers::motor::MotorCommand;
use crate::fsm::{StateDescriptor, StateSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HatchDeployState {
    Init = 0,
    ToBumper = 1,
    AutoCollision = 2,
    Defense = 3,
    Ground = 4,
    HumanStation = 5,
}

impl StateSet for HatchDeployState {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        self as usize
    }
}

impl HatchDeployState {
    pub const ALL: [HatchDeployState; HatchDeployState::COUNT] = [
        Self::Init,
        Self::ToBumper,
        Self::AutoCollision,
        Self::Defense,
        Self::Ground,
        Self::HumanStation,
    ];
}

pub fn build_state_table()
-> [StateDescriptor<HatchDeployState, DeployContext>; HatchDeployState::COUNT] {
    [
        StateDescriptor {
            id: HatchDeployState::Init,
            name: "Init",
            on_enter: None,
            on_exit: None,
            on_update: init_update,
        },
        StateDescriptor {
            id: HatchDeployState::ToBumper,
            name: "ToBumper",
            on_enter: Some(to_bumper_enter),
            on_exit: None,
            on_update: to_bumper_update,
        },
        StateDescriptor {
            id: HatchDeployState::AutoCollision,
            name: "AutoCollision",
            on_enter: Some(auto_collision_enter),
            on_exit: None,
            on_update: auto_collision_update,
        },
        StateDescriptor {
            id: HatchDeployState::Defense,
            name: "Defense",
            on_enter: Some(defense_enter),
            on_exit: None,
            on_update: defense_update,
        },
        StateDescriptor {
            id: HatchDeployState::Ground,
            name: "Ground",
            on_enter: Some(ground_enter),
            on_exit: None,
            on_update: dwell_update,
        },
        StateDescriptor {
            id: HatchDeployState::HumanStation,
            name: "HumanStation",
            on_enter: Some(human_station_enter),
            on_exit: None,
            on_update: dwell_update,
        },
    ]
}

// ---------------------------------------------------------------------------
// INIT: drive into the reverse limit to find zero
// ---------------------------------------------------------------------------

fn init_update(ctx: &mut DeployContext) -> Option<HatchDeployState> {
    if ctx.zeroed || ctx.inputs.faults.reverse_limit_switch {
        ctx.zeroed = true;
        return Some(HatchDeployState::ToBumper);
    }
    ctx.motor = MotorCommand::PercentOutput(ctx.config.zeroing_percent_output);
    None
}

// ---------------------------------------------------------------------------
// Holding positions
// ---------------------------------------------------------------------------

fn to_bumper_enter(ctx: &mut DeployContext) {
    ctx.set_target(ctx.config.bumper_position);
}

fn to_bumper_update(ctx: &mut DeployContext) -> Option<HatchDeployState> {
    let inputs = ctx.inputs;
    // A human-station press landing with a hatch press wins.
    if inputs.defense {
        Some(HatchDeployState::Defense)
    } else if inputs.human_pressed {
        Some(HatchDeployState::HumanStation)
    } else if inputs.hatch_pressed {
        Some(HatchDeployState::Ground)
    } else {
        None
    }
}

fn auto_collision_enter(ctx: &mut DeployContext) {
    ctx.set_target(ctx.config.collision_position);
}

fn auto_collision_update(ctx: &mut DeployContext) -> Option<HatchDeployState> {
    let inputs = ctx.inputs;
    if inputs.defense {
        Some(HatchDeployState::Defense)
    } else if inputs.hatch_pressed {
        Some(HatchDeployState::Ground)
    } else {
        None
    }
}

fn defense_enter(ctx: &mut DeployContext) {
    ctx.set_target(ctx.config.defense_position);
}

fn defense_update(ctx: &mut DeployContext) -> Option<HatchDeployState> {
    ctx.inputs
        .hatch_pressed
        .then_some(HatchDeployState::ToBumper)
}

// ---------------------------------------------------------------------------
// Timed excursions
// ---------------------------------------------------------------------------

fn ground_enter(ctx: &mut DeployContext) {
    ctx.set_target(ctx.config.ground_position);
    ctx.wait = TimedWait::new(ctx.inputs.now, ctx.config.ground_dwell_secs);
}

fn human_station_enter(ctx: &mut DeployContext) {
    ctx.set_target(ctx.config.human_station_position);
    ctx.wait = TimedWait::new(ctx.inputs.now, ctx.config.human_station_dwell_secs);
}

fn dwell_update(ctx: &mut DeployContext) -> Option<HatchDeployState> {
    ctx.wait
        .elapsed(ctx.inputs.now)
        .then_some(HatchDeployState::ToBumper)
}
