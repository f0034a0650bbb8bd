//! Composition root.
//!
//! [`Robot`] builds every subsystem exactly once from a validated
//! [`RobotConfig`] and the hardware it owns, and fixes the tick order.
//! Shared collaborators (clock, operator console, IMU, drive base, cargo
//! arm) are passed in on every call as one `Io` value.
//!
//! ```text
//!  RobotIo ──▶ ┌───────────────────────────────────┐ ──▶ TelemetrySink
//!              │              Robot                 │
//!  Hardware ◀──│ Hatch · HatchDeploy · Climber     │
//!              │          (Looper order)            │
//!              └───────────────────────────────────┘
//! ```

use log::info;

use crate::config::RobotConfig;
use crate::error::Result;
use crate::looper::{Loop, Looper, LooperStats};
use crate::subsystems::climber::Climber;
use crate::subsystems::hatch::Hatch;
use crate::subsystems::hatch_deploy::HatchDeploy;

use super::ports::{
    ArmPort, Clock, DrivePort, ImuPort, MotorPort, OperatorInput, SolenoidPort, TelemetrySink,
};
use super::telemetry::TelemetrySource;

/// Everything shared between loops for one tick.
pub trait RobotIo: Clock + OperatorInput + ImuPort + DrivePort + ArmPort {}

impl<T: Clock + OperatorInput + ImuPort + DrivePort + ArmPort + ?Sized> RobotIo for T {}

/// Hardware owned outright by the subsystems.
pub struct RobotHardware {
    pub hatch_grabber: Box<dyn SolenoidPort>,
    pub hatch_extender: Box<dyn SolenoidPort>,
    pub hatch_deploy_motor: Box<dyn MotorPort>,
    pub hatch_ejector: Box<dyn SolenoidPort>,
    pub climb_motor: Box<dyn MotorPort>,
    pub climb_cylinders: Box<dyn SolenoidPort>,
}

/// The three subsystems in tick order.
struct Subsystems {
    hatch: Hatch,
    hatch_deploy: HatchDeploy,
    climber: Climber,
}

impl Subsystems {
    fn loops<Io: RobotIo + ?Sized>(&mut self) -> [&mut dyn Loop<Io>; 3] {
        [&mut self.hatch, &mut self.hatch_deploy, &mut self.climber]
    }
}

pub struct Robot {
    looper: Looper,
    subsystems: Subsystems,
}

impl Robot {
    /// Validate `config` and build every subsystem.  Nothing is
    /// commanded until [`start`](Self::start).
    pub fn new(config: RobotConfig, hw: RobotHardware) -> Result<Self> {
        config.validate()?;
        let subsystems = Subsystems {
            hatch: Hatch::new(config.hatch, hw.hatch_grabber, hw.hatch_extender)?,
            hatch_deploy: HatchDeploy::new(
                config.hatch_deploy,
                hw.hatch_deploy_motor,
                hw.hatch_ejector,
            )?,
            climber: Climber::new(
                config.climber,
                config.loop_period_secs,
                hw.climb_motor,
                hw.climb_cylinders,
            )?,
        };
        info!("Robot: built, period {:.3}s", config.loop_period_secs);
        Ok(Self {
            looper: Looper::new(config.loop_period_secs),
            subsystems,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start<Io: RobotIo + ?Sized>(&mut self, io: &mut Io) -> Result<()> {
        self.looper.start(&mut self.subsystems.loops(), io)?;
        Ok(())
    }

    /// One period: every subsystem evaluates once, in tick order.
    pub fn tick<Io: RobotIo + ?Sized>(&mut self, io: &mut Io) -> Result<()> {
        self.looper.tick(&mut self.subsystems.loops(), io)?;
        Ok(())
    }

    pub fn stop<Io: RobotIo + ?Sized>(&mut self, io: &mut Io) -> Result<()> {
        self.looper.stop(&mut self.subsystems.loops(), io)?;
        Ok(())
    }

    /// Publish every subsystem's telemetry and the looper counters.
    pub fn log(&self, sink: &mut dyn TelemetrySink) {
        let s = &self.subsystems;
        let sources: [&dyn TelemetrySource; 3] = [&s.hatch, &s.hatch_deploy, &s.climber];
        self.looper.log(&sources, sink);
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.looper.is_running()
    }

    pub fn stats(&self) -> LooperStats {
        self.looper.stats()
    }

    pub fn hatch(&self) -> &Hatch {
        &self.subsystems.hatch
    }

    /// For autonomous routines (`retract`, `request_state`).
    pub fn hatch_mut(&mut self) -> &mut Hatch {
        &mut self.subsystems.hatch
    }

    pub fn hatch_deploy(&self) -> &HatchDeploy {
        &self.subsystems.hatch_deploy
    }

    pub fn hatch_deploy_mut(&mut self) -> &mut HatchDeploy {
        &mut self.subsystems.hatch_deploy
    }

    pub fn climber(&self) -> &Climber {
        &self.subsystems.climber
    }

    pub fn climber_mut(&mut self) -> &mut Climber {
        &mut self.subsystems.climber
    }
}
