use serde::Serialize;

use crate::analysis::SanitizeStats;
use crate::domain::{MarkerSet, MarkerType, Position, Trajectory};

/// One trajectory queued for analysis
#[derive(Debug, Clone)]
pub struct TrajectoryJob {
    /// Position in the caller's input list. Results are reported back in this order.
    pub index: usize,
    pub label: String,
    pub positions: Vec<Position>,
}

impl TrajectoryJob {
    pub fn new(index: usize, trajectory: Trajectory) -> Self {
        Self {
            index,
            label: trajectory.label,
            positions: trajectory.positions,
        }
    }
}

/// What a successful job hands back: the cleaned trajectory and its local markers.
#[derive(Debug, Clone)]
pub struct TrajectoryOutput {
    pub trajectory: Trajectory,
    /// Stops (condensed when enabled) and turn candidates, before cross-trajectory reconciliation
    pub markers: MarkerSet,
    pub stats: SanitizeStats,
}

/// The result returned by the worker
#[derive(Debug, Clone)]
pub struct JobResult {
    pub index: usize,
    pub label: String,
    pub duration_ms: u128,

    pub result: Result<TrajectoryOutput, String>,
}

/// A trajectory that could not be analysed. The rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrajectoryFailure {
    pub index: usize,
    pub label: String,
    pub reason: String,
}

/// Per-trajectory bookkeeping for the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrajectoryReport {
    pub index: usize,
    pub label: String,
    pub sanitize: SanitizeStats,
    /// Local marker counts, before reconciliation against other trajectories
    pub stops: usize,
    pub left_turns: usize,
    pub right_turns: usize,
    pub u_turns: usize,
}

impl TrajectoryReport {
    pub fn new(index: usize, label: &str, output: &TrajectoryOutput) -> Self {
        Self {
            index,
            label: label.to_string(),
            sanitize: output.stats,
            stops: output.markers.count(MarkerType::Stop),
            left_turns: output.markers.count(MarkerType::LeftTurn),
            right_turns: output.markers.count(MarkerType::RightTurn),
            u_turns: output.markers.count(MarkerType::UTurn),
        }
    }
}

/// Everything one `analyze` call produces.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PipelineResult {
    /// Sanitized trajectories, in input order, failed ones left out
    pub trajectories: Vec<Trajectory>,
    /// Reconciled markers over all trajectories
    pub markers: MarkerSet,
    pub failures: Vec<TrajectoryFailure>,
    pub reports: Vec<TrajectoryReport>,
}
