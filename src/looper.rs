//! Periodic loop contract and lifecycle guard.
//!
//! The host runtime owns the timer.  Once per period it calls
//! [`Looper::tick`], which invokes every registered [`Loop`] in slice
//! order.  The order is fixed by the caller and never reshuffled, so a
//! loop can rely on state written earlier in the same tick.
//!
//! ```text
//!   start ──▶ tick ──▶ tick ──▶ ... ──▶ stop ──▶ start ...
//!   on_start   on_loop   on_loop          on_stop
//! ```
//!
//! The guard enforces the contract: `on_start` once before the first
//! `on_loop`, no `on_loop` after `on_stop` until the next `start`.
//! Violations are reported as [`LifecycleError`] and nothing is called.

use log::{debug, info, warn};

use crate::app::ports::{Clock, TelemetrySink};
use crate::app::telemetry::TelemetrySource;
use crate::error::LifecycleError;

/// A measured period longer than this multiple of the configured one
/// counts as an overrun.
pub const OVERRUN_FACTOR: f64 = 1.5;

/// One periodically driven subsystem.
///
/// `Io` carries the collaborators shared between loops (clock, operator
/// input, drive base, ...).  Hardware a loop owns outright lives inside
/// the implementing struct.
pub trait Loop<Io: ?Sized> {
    fn name(&self) -> &'static str;

    /// Reset to the initial state and command a safe idle configuration.
    fn on_start(&mut self, io: &mut Io);

    /// One state evaluation and one round of actuator commands.
    fn on_loop(&mut self, io: &mut Io);

    /// Command a safe neutral configuration.  No evaluation.
    fn on_stop(&mut self, io: &mut Io);
}

/// Running counters for the loop set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LooperStats {
    pub ticks: u64,
    pub overruns: u64,
    /// Longest measured tick-to-tick interval (seconds)
    pub max_period_secs: f64,
}

pub struct Looper {
    period_secs: f64,
    running: bool,
    last_tick_secs: Option<f64>,
    stats: LooperStats,
}

impl Looper {
    pub fn new(period_secs: f64) -> Self {
        Self {
            period_secs,
            running: false,
            last_tick_secs: None,
            stats: LooperStats::default(),
        }
    }

    pub fn start<Io: Clock + ?Sized>(
        &mut self,
        loops: &mut [&mut dyn Loop<Io>],
        io: &mut Io,
    ) -> Result<(), LifecycleError> {
        if self.running {
            warn!("Looper: start while already running");
            return Err(LifecycleError::AlreadyRunning);
        }
        info!("Looper: starting {} loops", loops.len());
        for l in loops.iter_mut() {
            debug!("Looper: on_start {}", l.name());
            l.on_start(io);
        }
        self.running = true;
        self.last_tick_secs = None;
        self.stats = LooperStats::default();
        Ok(())
    }

    pub fn tick<Io: Clock + ?Sized>(
        &mut self,
        loops: &mut [&mut dyn Loop<Io>],
        io: &mut Io,
    ) -> Result<(), LifecycleError> {
        if !self.running {
            warn!("Looper: tick before start");
            return Err(LifecycleError::NotRunning);
        }

        let now = io.now_secs();
        if let Some(last) = self.last_tick_secs {
            let measured = now - last;
            if measured > self.stats.max_period_secs {
                self.stats.max_period_secs = measured;
            }
            if measured > OVERRUN_FACTOR * self.period_secs {
                self.stats.overruns += 1;
                warn!(
                    "Looper: overrun, {:.4}s since last tick (period {:.4}s)",
                    measured, self.period_secs
                );
            }
        }
        self.last_tick_secs = Some(now);
        self.stats.ticks += 1;

        for l in loops.iter_mut() {
            l.on_loop(io);
        }
        Ok(())
    }

    pub fn stop<Io: ?Sized>(
        &mut self,
        loops: &mut [&mut dyn Loop<Io>],
        io: &mut Io,
    ) -> Result<(), LifecycleError> {
        if !self.running {
            warn!("Looper: stop while stopped");
            return Err(LifecycleError::NotRunning);
        }
        for l in loops.iter_mut() {
            l.on_stop(io);
        }
        self.running = false;
        info!("Looper: stopped after {} ticks", self.stats.ticks);
        Ok(())
    }

    /// Write every source's telemetry, then the looper's own counters.
    pub fn log(&self, sources: &[&dyn TelemetrySource], sink: &mut dyn TelemetrySink) {
        for source in sources {
            source.log(sink);
        }
        sink.put("Looper/ticks", (self.stats.ticks as f64).into());
        sink.put("Looper/overruns", (self.stats.overruns as f64).into());
        sink.put("Looper/maxPeriodSecs", self.stats.max_period_secs.into());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stats(&self) -> LooperStats {
        self.stats
    }
}
