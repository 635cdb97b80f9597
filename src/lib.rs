#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod analysis;
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod utils;

use std::path::PathBuf;

// Re-export commonly used types outside of crate
pub use config::{ANALYSIS, AnalysisConfig, ConfigError};
pub use domain::{EventCandidate, MarkerSet, MarkerType, Position, Trajectory};
pub use engine::{CostMapEngine, PipelineResult, TrajectoryFailure, TrajectoryReport};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Turns GPS logs into a map of stops and turns", long_about = None)]
pub struct Cli {
    /// NMEA logs, or `.json` position lists
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write paths and markers as KML
    #[arg(long)]
    pub kml: Option<PathBuf>,

    /// Write the full result as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// JSON file overriding any of the analysis defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Process trajectories one at a time instead of in parallel
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Speed (mph) below which a fix counts as slow
    #[arg(long)]
    pub slow_speed: Option<f64>,
}

/// Runs the whole pipeline with the default configuration.
pub fn analyze(trajectories: Vec<Trajectory>) -> PipelineResult {
    CostMapEngine::default().analyze(trajectories)
}
