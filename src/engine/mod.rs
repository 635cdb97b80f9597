mod core;
mod messages;
mod worker;

pub use core::CostMapEngine;

pub use messages::{PipelineResult, TrajectoryFailure, TrajectoryReport};
