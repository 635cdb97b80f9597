use serde::{Deserialize, Serialize};

use crate::config::{DF, SanitizerSettings, Seconds};
use crate::domain::Position;

/// Why fixes were removed from one trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SanitizeStats {
    pub input_len: usize,
    /// Warm-up fixes removed before the trip began moving
    pub trimmed_start: usize,
    /// Cool-down fixes removed after the trip stopped moving (both trim passes)
    pub trimmed_end: usize,
    pub dropped_out_of_order: usize,
    pub dropped_implausible_speed: usize,
    pub output_len: usize,
}

impl SanitizeStats {
    pub fn removed(&self) -> usize {
        self.input_len - self.output_len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairVerdict {
    Valid,
    OutOfOrder,
    ImplausibleSpeed,
}

/// Removes warm-up/cool-down fixes, out-of-order fixes and physically implausible speed jumps.
/// The result is an order-preserving subsequence of the input.
pub fn sanitize(positions: Vec<Position>, settings: &SanitizerSettings) -> Vec<Position> {
    sanitize_with_stats(positions, settings).0
}

pub fn sanitize_with_stats(
    positions: Vec<Position>,
    settings: &SanitizerSettings,
) -> (Vec<Position>, SanitizeStats) {
    let mut stats = SanitizeStats {
        input_len: positions.len(),
        ..Default::default()
    };

    // 1. Trip edges first, so a parked warm-up never becomes the reference for the pairwise scan
    let (start, end) = moving_bounds(&positions, settings);
    stats.trimmed_start = start;
    stats.trimmed_end = positions.len() - end;
    let trimmed = &positions[start..end];

    if trimmed.len() < 2 {
        stats.output_len = trimmed.len();
        log_stats(&stats);
        return (trimmed.to_vec(), stats);
    }

    // 2. Pairwise scan against the last KEPT fix. A dropped fix never becomes the reference.
    let mut kept: Vec<Position> = Vec::with_capacity(trimmed.len());
    kept.push(trimmed[0]);
    for current in &trimmed[1..] {
        let Some(last) = kept.last() else { break };
        match check_pair(last, current, settings) {
            PairVerdict::Valid => kept.push(*current),
            PairVerdict::OutOfOrder => stats.dropped_out_of_order += 1,
            PairVerdict::ImplausibleSpeed => stats.dropped_implausible_speed += 1,
        }
    }

    // 3. A drop near the end can leave a stationary tail behind
    let (_, tail_end) = moving_bounds(&kept, settings);
    stats.trimmed_end += kept.len() - tail_end;
    kept.truncate(tail_end);

    stats.output_len = kept.len();
    log_stats(&stats);
    (kept, stats)
}

fn is_moving(position: &Position, settings: &SanitizerSettings) -> bool {
    position.speed.is_some_and(|s| s >= settings.moving_speed)
}

/// Half-open index range between the first and last moving fix. `(0, 0)` if nothing moves.
fn moving_bounds(positions: &[Position], settings: &SanitizerSettings) -> (usize, usize) {
    let Some(first) = positions.iter().position(|p| is_moving(p, settings)) else {
        return (0, 0);
    };
    let last = positions
        .iter()
        .rposition(|p| is_moving(p, settings))
        .unwrap_or(first);
    (first, last + 1)
}

fn check_pair(last: &Position, current: &Position, settings: &SanitizerSettings) -> PairVerdict {
    if current.timestamp <= last.timestamp {
        return PairVerdict::OutOfOrder;
    }

    // Without both speeds there is nothing to judge the jump against
    let (Some(last_speed), Some(current_speed)) = (last.speed, current.speed) else {
        return PairVerdict::Valid;
    };

    let elapsed = Seconds::between(last.timestamp, current.timestamp).value();
    if elapsed <= 0.0 {
        // Sub-millisecond spacing: strictly later, but too close to measure a rate over
        return PairVerdict::OutOfOrder;
    }

    let delta = current_speed.value() - last_speed.value();
    let rate = delta.abs() / elapsed;
    let limit = if delta > 0.0 {
        settings.acceleration_limit.value()
    } else {
        settings.deceleration_limit.value()
    };

    if rate <= limit {
        PairVerdict::Valid
    } else {
        PairVerdict::ImplausibleSpeed
    }
}

fn log_stats(stats: &SanitizeStats) {
    if DF.log_sanitizer {
        log::debug!(
            "sanitize: {} -> {} positions (start trim {}, end trim {}, out-of-order {}, implausible speed {})",
            stats.input_len,
            stats.output_len,
            stats.trimmed_start,
            stats.trimmed_end,
            stats.dropped_out_of_order,
            stats.dropped_implausible_speed
        );
    }
}
