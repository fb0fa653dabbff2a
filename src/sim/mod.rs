pub mod sim_op;
pub mod simulation;

pub use simulation::{OpTiming, SimProps, Simulation, StopReason};
