use rayon::prelude::*;

use crate::analysis::reconcile;
use crate::config::{ANALYSIS, AnalysisConfig, ConfigError};
use crate::domain::{MarkerSet, Trajectory};

use super::messages::{JobResult, PipelineResult, TrajectoryFailure, TrajectoryJob, TrajectoryReport};
use super::worker;

/// Owns a validated configuration and runs batches of trajectories through the pipeline.
#[derive(Debug, Clone)]
pub struct CostMapEngine {
    config: AnalysisConfig,
}

impl Default for CostMapEngine {
    fn default() -> Self {
        Self { config: ANALYSIS }
    }
}

impl CostMapEngine {
    /// Validates `config` once; every later `analyze` call trusts it.
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Sanitizes and scans every trajectory independently, then reconciles all markers together.
    ///
    /// A trajectory that fails is reported in `failures` and left out of `trajectories`;
    /// the others are unaffected. Output order follows input order either way.
    pub fn analyze(&self, trajectories: Vec<Trajectory>) -> PipelineResult {
        let jobs: Vec<TrajectoryJob> = trajectories
            .into_iter()
            .enumerate()
            .map(|(index, trajectory)| TrajectoryJob::new(index, trajectory))
            .collect();
        let job_count = jobs.len();

        let results: Vec<JobResult> = crate::trace_time!("Process jobs", 100, {
            if self.config.parallel {
                // Indexed parallel iterators collect in input order
                jobs.into_par_iter()
                    .map(|job| worker::process_trajectory(job, &self.config))
                    .collect()
            } else {
                jobs.into_iter()
                    .map(|job| worker::process_trajectory(job, &self.config))
                    .collect()
            }
        });

        let mut output = PipelineResult::default();
        let mut pool = MarkerSet::default();

        for job in results {
            match job.result {
                Ok(done) => {
                    log::debug!("'{}' done in {}ms", job.label, job.duration_ms);
                    output.reports.push(TrajectoryReport::new(job.index, &job.label, &done));
                    pool.extend(done.markers);
                    output.trajectories.push(done.trajectory);
                }
                Err(reason) => {
                    log::warn!("skipping trajectory: {}", reason);
                    output.failures.push(TrajectoryFailure {
                        index: job.index,
                        label: job.label,
                        reason,
                    });
                }
            }
        }

        let before = pool.total();
        output.markers = crate::trace_time!("Reconcile", 100, {
            reconcile(pool, self.config.markers.reconcile_distance)
        });

        log::info!(
            "analyzed {} trajectories ({} failed): {} candidate markers -> {} markers",
            job_count,
            output.failures.len(),
            before,
            output.markers.total()
        );

        output
    }
}
