//! Application core: the robot's domain boundary.
//!
//! All interaction with hardware happens through the **port traits**
//! defined in [`ports`], keeping the subsystems fully testable without
//! real devices.  [`robot`] wires the subsystems together; [`telemetry`]
//! carries what they publish each tick.

pub mod ports;
pub mod robot;
pub mod telemetry;
