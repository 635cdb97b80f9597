use std::time::Instant;

use anyhow::{Context, Result, bail};

use super::messages::{JobResult, TrajectoryJob, TrajectoryOutput};

use crate::analysis::{condense_stops, detect_stops, detect_turns, sanitize_with_stats};
use crate::config::AnalysisConfig;
use crate::domain::{MarkerSet, MarkerType, Trajectory};

/// Runs the per-trajectory stages. Never panics on bad input; the error travels back in the result.
pub fn process_trajectory(job: TrajectoryJob, config: &AnalysisConfig) -> JobResult {
    let start = Instant::now();
    let index = job.index;
    let label = job.label.clone();

    let result = crate::trace_time!(&format!("Total JOB [{}]", label), 50, {
        run_stages(job, config).with_context(|| format!("trajectory #{} '{}'", index, label))
    });

    JobResult {
        index,
        label,
        duration_ms: start.elapsed().as_millis(),
        // {:#} keeps the whole context chain on one line
        result: result.map_err(|e| format!("{:#}", e)),
    }
}

fn run_stages(job: TrajectoryJob, config: &AnalysisConfig) -> Result<TrajectoryOutput> {
    let TrajectoryJob { label, positions, .. } = job;

    // 1. Reject coordinates the geometry cannot work with
    if let Some((i, bad)) = positions.iter().enumerate().find(|(_, p)| !p.has_valid_coordinates()) {
        bail!(
            "position {} has invalid coordinates ({}, {})",
            i,
            bad.latitude,
            bad.longitude
        );
    }

    // 2. Sanitize
    let (clean, stats) = crate::trace_time!(&format!("1. Sanitize [{}]", label), 5, {
        sanitize_with_stats(positions, &config.sanitizer)
    });

    // 3. Detect
    let stops = detect_stops(&clean, &config.detection);
    let turns = crate::trace_time!(&format!("2. Turns [{}]", label), 5, {
        detect_turns(&clean, config)
    })
    .context("turn detection")?;

    // 4. Condense
    let stops = if config.markers.condense_stops {
        crate::trace_time!(&format!("3. Condense [{}]", label), 5, {
            condense_stops(&stops, &turns, config)
        })
    } else {
        stops
    };

    let mut markers: MarkerSet = turns.into_iter().collect();
    markers.stops = stops;

    log::debug!(
        "'{}': {} positions kept of {}, {} stops, {} left / {} right / {} U-turns",
        label,
        stats.output_len,
        stats.input_len,
        markers.count(MarkerType::Stop),
        markers.count(MarkerType::LeftTurn),
        markers.count(MarkerType::RightTurn),
        markers.count(MarkerType::UTurn)
    );

    Ok(TrajectoryOutput {
        trajectory: Trajectory::new(label, clean),
        markers,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mph;
    use crate::domain::Position;
    use chrono::{Duration, TimeZone, Utc};

    fn fix(i: i64, lat: f64, mph: f64) -> Position {
        let t0 = Utc.with_ymd_and_hms(2019, 3, 19, 14, 0, 0).unwrap();
        Position::new(lat, -83.0, Some(Mph::new(mph)), t0 + Duration::seconds(i))
    }

    #[test]
    fn invalid_coordinates_fail_with_context() {
        let mut positions: Vec<Position> = (0..5).map(|i| fix(i, 42.0 + i as f64 * 1e-4, 30.0)).collect();
        positions[3].latitude = f64::NAN;
        let job = TrajectoryJob::new(2, Trajectory::new("bad.nmea", positions));

        let out = process_trajectory(job, &AnalysisConfig::default());
        assert_eq!(out.index, 2);
        let reason = out.result.unwrap_err();
        assert!(reason.contains("trajectory #2 'bad.nmea'"), "{}", reason);
        assert!(reason.contains("position 3"), "{}", reason);
    }

    #[test]
    fn out_of_range_latitude_is_invalid() {
        let positions = vec![fix(0, 42.0, 30.0), fix(1, 91.0, 30.0)];
        let job = TrajectoryJob::new(0, Trajectory::new("t", positions));
        assert!(process_trajectory(job, &AnalysisConfig::default()).result.is_err());
    }

    #[test]
    fn condensation_can_be_switched_off() {
        // Ten fixes crawling at 5 mph, bracketed by 30 mph driving on a straight road
        let mut positions = vec![fix(0, 42.0, 30.0), fix(2, 42.0002, 10.0)];
        positions.extend((0..10).map(|i| fix(4 + i, 42.0003, 5.0)));
        positions.push(fix(16, 42.0004, 10.0));
        positions.push(fix(18, 42.0006, 30.0));

        let mut cfg = AnalysisConfig::default();
        let condensed = process_trajectory(TrajectoryJob::new(0, Trajectory::new("t", positions.clone())), &cfg)
            .result
            .unwrap();
        assert_eq!(condensed.markers.stops.len(), 1);

        cfg.markers.condense_stops = false;
        let raw = process_trajectory(TrajectoryJob::new(0, Trajectory::new("t", positions)), &cfg)
            .result
            .unwrap();
        assert_eq!(raw.markers.stops.len(), 12);
        assert_eq!(raw.stats.output_len, 14);
    }
}
