use crate::analysis::agglomeration::agglomerate;
use crate::config::{AnalysisConfig, DF, Degrees, DetectionSettings, Seconds, TurnRepresentative};
use crate::domain::{EventCandidate, Located, MarkerType, Position};
use crate::utils::geometry::{GeometryError, bearing, bearing_difference, centroid, distance};

/// Every slow fix is a stop candidate. Merging them is the reconciler's job.
pub fn detect_stops(positions: &[Position], settings: &DetectionSettings) -> Vec<Position> {
    positions
        .iter()
        .filter(|p| p.is_slower_than(settings.slow_speed))
        .copied()
        .collect()
}

/// Finds slow-down segments whose heading changed enough to count as a turn.
///
/// Slow fixes are chained into segments with the tight turn-merge distance. A segment needs
/// enough fixes for a stable heading estimate and must not outlast the event window (a long
/// slow segment is parking, not turning). The heading going in is taken from the first step
/// that actually moves, and the heading coming out from the last one.
pub fn detect_turns(positions: &[Position], config: &AnalysisConfig) -> Result<Vec<EventCandidate>, GeometryError> {
    let settings = &config.detection;
    let max_duration = config.markers.max_event_duration;

    let slow_downs = detect_stops(positions, settings);
    let mut turns = Vec::new();

    for segment in agglomerate(&slow_downs, settings.turn_merge_distance) {
        if segment.len() < settings.min_turn_segment_len {
            continue;
        }
        let (first, last) = (&segment[0], &segment[segment.len() - 1]);
        let duration = Seconds::between(first.timestamp, last.timestamp);
        if duration > max_duration {
            continue;
        }

        let n = segment.len();
        let Some((initial, final_heading)) = entry_and_exit_headings(segment)? else {
            // Every fix in the segment sits on the same spot: no heading to compare
            if DF.log_turn_segments {
                log::debug!("stationary segment of {} fixes at {} skipped", n, first.timestamp);
            }
            continue;
        };

        let diff = bearing_difference(initial, final_heading);
        let verdict = classify_turn(diff, settings.turn_bearing_threshold);

        if DF.log_turn_segments {
            log::debug!(
                "turn segment of {} fixes over {}: {} -> {} (diff {}) => {:?}",
                n,
                duration,
                initial,
                final_heading,
                diff,
                verdict
            );
        }

        if let Some(marker_type) = verdict {
            let representative = match settings.turn_representative {
                TurnRepresentative::Medoid => medoid(segment)?,
                TurnRepresentative::TemporalMidpoint => temporal_midpoint(segment)?,
            };
            turns.push(EventCandidate::new(marker_type, *representative));
        }
    }

    Ok(turns)
}

/// Heading over the first and over the last step between consecutive fixes at distinct
/// coordinates. A vehicle waiting at a stop line repeats its fix, so those steps are passed over.
/// `None` when no step moves at all.
fn entry_and_exit_headings(segment: &[Position]) -> Result<Option<(Degrees, Degrees)>, GeometryError> {
    let mut moves = segment.windows(2).filter(|w| !w[0].same_spot(&w[1]));
    let Some(entry) = moves.next() else {
        return Ok(None);
    };
    let exit = moves.next_back().unwrap_or(entry);
    Ok(Some((bearing(&entry[0], &entry[1])?, bearing(&exit[0], &exit[1])?)))
}

/// Maps a signed heading change onto a turn type. `None` means ordinary slow traffic.
pub fn classify_turn(diff: Degrees, threshold: Degrees) -> Option<MarkerType> {
    let magnitude = diff.abs();
    let threshold = threshold.value();

    if (magnitude - 180.0).abs() < threshold {
        Some(MarkerType::UTurn)
    } else if magnitude > threshold {
        if diff.value() < 0.0 {
            Some(MarkerType::LeftTurn)
        } else {
            Some(MarkerType::RightTurn)
        }
    } else {
        None
    }
}

/// The member closest to the arithmetic-mean centroid. Ties go to the earliest member.
pub fn medoid<T: Located>(items: &[T]) -> Result<&T, GeometryError> {
    let (latitude, longitude) = centroid(items)?;

    let mut best = &items[0];
    let mut best_distance = f64::INFINITY;
    for item in items {
        let p = item.position();
        let d = distance(p, &Position { latitude, longitude, ..*p }).value();
        if d < best_distance {
            best = item;
            best_distance = d;
        }
    }
    Ok(best)
}

/// The member closest in time to halfway between the first and last member. Ties go to the earliest.
pub fn temporal_midpoint<T: Located>(items: &[T]) -> Result<&T, GeometryError> {
    let (Some(first), Some(last)) = (items.first(), items.last()) else {
        return Err(GeometryError::EmptyInput);
    };
    let start = first.position().timestamp;
    let half_span = (last.position().timestamp - start) / 2;
    let midpoint = start + half_span;

    items
        .iter()
        .min_by_key(|item| (item.position().timestamp - midpoint).num_milliseconds().abs())
        .ok_or(GeometryError::EmptyInput)
}
