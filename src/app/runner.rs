use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::report::render_summary;
use crate::Cli;
use crate::config::{ANALYSIS, AnalysisConfig, Mph};
use crate::data::{load_trajectory, write_json, write_kml};
use crate::engine::{CostMapEngine, PipelineResult};

/// Command-line entry point: load, analyze, write, summarize.
pub fn run(args: Cli) -> Result<()> {
    let config = resolve_config(&args)?;
    let engine = CostMapEngine::new(config).context("invalid configuration")?;

    let mut trajectories = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        match load_trajectory(path) {
            Ok(trajectory) => trajectories.push(trajectory),
            Err(e) => log::error!("skipping {}: {:#}", path.display(), e),
        }
    }
    if trajectories.is_empty() {
        bail!("none of the {} input files could be read", args.inputs.len());
    }

    let result = engine.analyze(trajectories);

    if let Some(path) = &args.kml {
        write_output(path, &result, |w, r| write_kml(w, r))?;
        log::info!("wrote KML to {}", path.display());
    }
    if let Some(path) = &args.json {
        write_output(path, &result, |w, r| write_json(w, r))?;
        log::info!("wrote JSON to {}", path.display());
    }

    println!("{}", render_summary(&result));
    Ok(())
}

/// Config file (or defaults), then command-line overrides on top.
fn resolve_config(args: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => ANALYSIS,
    };
    if args.sequential {
        config.parallel = false;
    }
    if let Some(mph) = args.slow_speed {
        config.detection.slow_speed = Mph::new(mph);
    }
    Ok(config)
}

fn write_output<F>(path: &Path, result: &PipelineResult, write: F) -> Result<()>
where
    F: FnOnce(BufWriter<File>, &PipelineResult) -> Result<()>,
{
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write(BufWriter::new(file), result).with_context(|| format!("writing {}", path.display()))
}
