//! Hatch grabber state handlers and table builder.
//!
//! ```text
//!  INIT
//!
//!  (any) ──[grab press]──▶ ACQUIRE ──[grab release]──▶ ACQUIRE_DELAY
//!                                                          │ grab delay
//!                                                          ▼
//!  (any) ──[extend press]──────────────────────────────▶ HOLD_HATCH
//!                                                          │ extend release
//!                                                          ▼
//!                      RELEASE ◀──[release delay]──── RELEASE_DELAY
//!
//!  (any) ──[defense held]──▶ DEFENSE
//! ```
//!
//! The three `(any)` arrows are the pre-emption guard.  Defense
//! beats an extend press, which beats a grab press.

use super::context::{
    ARM_EXTENDED, ARM_RETRACTED, GRABBER_CLOSED, GRABBER_OPEN, HatchContext,
};
use crate::control::timer::TimedWait;
use crate::fsm::{StateDescriptor, StateSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HatchState {
    Init = 0,
    Acquire = 1,
    AcquireDelay = 2,
    HoldHatch = 3,
    ReleaseDelay = 4,
    Release = 5,
    Defense = 6,
}

impl StateSet for HatchState {
    const COUNT: usize = 7;

    fn index(self) -> usize {
        self as usize
    }
}

impl HatchState {
    pub const ALL: [HatchState; HatchState::COUNT] = [
        Self::Init,
        Self::Acquire,
        Self::AcquireDelay,
        Self::HoldHatch,
        Self::ReleaseDelay,
        Self::Release,
        Self::Defense,
    ];
}

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table() -> [StateDescriptor<HatchState, HatchContext>; HatchState::COUNT] {
    [
        StateDescriptor {
            id: HatchState::Init,
            name: "Init",
            on_enter: Some(init_enter),
            on_exit: None,
            on_update: hold,
        },
        StateDescriptor {
            id: HatchState::Acquire,
            name: "Acquire",
            on_enter: Some(acquire_enter),
            on_exit: None,
            on_update: acquire_update,
        },
        StateDescriptor {
            id: HatchState::AcquireDelay,
            name: "AcquireDelay",
            on_enter: Some(acquire_delay_enter),
            on_exit: None,
            on_update: acquire_delay_update,
        },
        StateDescriptor {
            id: HatchState::HoldHatch,
            name: "HoldHatch",
            on_enter: Some(hold_hatch_enter),
            on_exit: None,
            on_update: hold_hatch_update,
        },
        StateDescriptor {
            id: HatchState::ReleaseDelay,
            name: "ReleaseDelay",
            on_enter: Some(release_delay_enter),
            on_exit: None,
            on_update: release_delay_update,
        },
        StateDescriptor {
            id: HatchState::Release,
            name: "Release",
            on_enter: Some(release_enter),
            on_exit: None,
            on_update: hold,
        },
        StateDescriptor {
            id: HatchState::Defense,
            name: "Defense",
            on_enter: Some(defense_enter),
            on_exit: None,
            on_update: hold,
        },
    ]
}

/// Global overrides, checked before the current state's own guards.
pub fn preempt(_current: HatchState, ctx: &mut HatchContext) -> Option<HatchState> {
    let inputs = &ctx.inputs;
    if inputs.defense {
        Some(HatchState::Defense)
    } else if inputs.extend.pressed {
        Some(HatchState::HoldHatch)
    } else if inputs.grab.pressed {
        Some(HatchState::Acquire)
    } else {
        None
    }
}

/// States that only leave through the pre-emption guard.
fn hold(_ctx: &mut HatchContext) -> Option<HatchState> {
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  INIT
// ═══════════════════════════════════════════════════════════════════════════

fn init_enter(ctx: &mut HatchContext) {
    ctx.commands.grabber = GRABBER_OPEN;
    ctx.commands.extender = ARM_RETRACTED;
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACQUIRE: fingers closed so they slip inside the hatch ring, arm out
// ═══════════════════════════════════════════════════════════════════════════

fn acquire_enter(ctx: &mut HatchContext) {
    ctx.commands.grabber = GRABBER_CLOSED;
    ctx.commands.extender = ARM_EXTENDED;
}

fn acquire_update(ctx: &mut HatchContext) -> Option<HatchState> {
    ctx.inputs.grab.released.then_some(HatchState::AcquireDelay)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACQUIRE_DELAY: fingers open to grip, give them time to seat
// ═══════════════════════════════════════════════════════════════════════════

fn acquire_delay_enter(ctx: &mut HatchContext) {
    ctx.commands.grabber = GRABBER_OPEN;
    ctx.wait = TimedWait::new(ctx.inputs.now, ctx.config.grab_delay_secs);
}

fn acquire_delay_update(ctx: &mut HatchContext) -> Option<HatchState> {
    ctx.wait
        .elapsed(ctx.inputs.now)
        .then_some(HatchState::HoldHatch)
}

// ═══════════════════════════════════════════════════════════════════════════
//  HOLD_HATCH
// ═══════════════════════════════════════════════════════════════════════════

fn hold_hatch_enter(ctx: &mut HatchContext) {
    ctx.commands.grabber = GRABBER_OPEN;
    ctx.commands.extender = ARM_EXTENDED;
}

fn hold_hatch_update(ctx: &mut HatchContext) -> Option<HatchState> {
    ctx.inputs.extend.released.then_some(HatchState::ReleaseDelay)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RELEASE_DELAY: fingers close to drop the hatch before the arm pulls back
// ═══════════════════════════════════════════════════════════════════════════

fn release_delay_enter(ctx: &mut HatchContext) {
    ctx.commands.grabber = GRABBER_CLOSED;
    ctx.wait = TimedWait::new(ctx.inputs.now, ctx.config.release_delay_secs);
}

fn release_delay_update(ctx: &mut HatchContext) -> Option<HatchState> {
    ctx.wait
        .elapsed(ctx.inputs.now)
        .then_some(HatchState::Release)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RELEASE / DEFENSE
// ═══════════════════════════════════════════════════════════════════════════

fn release_enter(ctx: &mut HatchContext) {
    ctx.commands.extender = ARM_RETRACTED;
}

fn defense_enter(ctx: &mut HatchContext) {
    ctx.commands.grabber = GRABBER_CLOSED;
    ctx.commands.extender = ARM_RETRACTED;
}
