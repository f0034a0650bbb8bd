//! Blackboard threaded through the hatch grabber state handlers.
//!
//! The loop fills [`HatchInputs`] before each tick and applies
//! [`HatchCommands`] after it.  Handlers never see the valves.

use crate::app::ports::SolenoidPosition;
use crate::config::HatchConfig;
use crate::control::edge::EdgeEvents;
use crate::control::timer::TimedWait;

/// Valve position that opens the grabber fingers.
pub const GRABBER_OPEN: SolenoidPosition = SolenoidPosition::Extend;
pub const GRABBER_CLOSED: SolenoidPosition = SolenoidPosition::Retract;
pub const ARM_EXTENDED: SolenoidPosition = SolenoidPosition::Extend;
pub const ARM_RETRACTED: SolenoidPosition = SolenoidPosition::Retract;

// ---------------------------------------------------------------------------
// Inputs (written by the loop; read-only to handlers)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct HatchInputs {
    /// Clock sample for this tick (seconds).
    pub now: f64,
    /// False while the operator drives cargo; hatch buttons read as released.
    pub driving_hatch: bool,
    pub grab: EdgeEvents,
    pub extend: EdgeEvents,
    /// Defense button level.  Not gated by `driving_hatch`.
    pub defense: bool,
}

// ---------------------------------------------------------------------------
// Commands (written by handlers; applied by the loop)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HatchCommands {
    pub grabber: SolenoidPosition,
    pub extender: SolenoidPosition,
}

impl HatchCommands {
    /// Grabber open, arm in.
    pub const SAFE_IDLE: Self = Self {
        grabber: GRABBER_OPEN,
        extender: ARM_RETRACTED,
    };
}

impl Default for HatchCommands {
    fn default() -> Self {
        Self::SAFE_IDLE
    }
}

pub struct HatchContext {
    pub config: HatchConfig,
    pub inputs: HatchInputs,
    pub commands: HatchCommands,
    /// Armed on entry to either delay state.
    pub wait: TimedWait,
}

impl HatchContext {
    pub fn new(config: HatchConfig) -> Self {
        Self {
            config,
            inputs: HatchInputs::default(),
            commands: HatchCommands::SAFE_IDLE,
            wait: TimedWait::new(0.0, 0.0),
        }
    }
}
