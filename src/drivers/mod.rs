//! Actuator drivers: thin wrappers over the port traits that suppress
//! repeated identical commands.

pub mod latch;
pub mod motor;
pub mod solenoid;
