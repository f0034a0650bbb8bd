//! Hatchbot control library.
//!
//! Periodic state-machine control for a competition robot's hatch
//! grabber, hatch deploy arm and HAB climber.  Everything here is pure
//! logic behind port traits; the host runtime supplies the timer and the
//! device adapters.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod fsm;
pub mod looper;
pub mod subsystems;

mod error;

pub use error::{ConfigError, Error, LifecycleError, Result};
