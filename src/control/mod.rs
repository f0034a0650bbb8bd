//! Small control primitives shared by every subsystem.

pub mod edge;
pub mod pid;
pub mod timer;
