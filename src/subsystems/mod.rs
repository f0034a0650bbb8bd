//! Robot subsystems.  Each one is a state table, a context the handlers
//! share, and a [`Loop`](crate::looper::Loop) implementation that
//! samples inputs, runs one FSM tick and writes actuators.

pub mod climber;
pub mod hatch;
pub mod hatch_deploy;
