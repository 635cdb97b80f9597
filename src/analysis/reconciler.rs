use itertools::Itertools;

use crate::analysis::agglomeration::agglomerate;
use crate::config::{AnalysisConfig, DF, Miles, Seconds};
use crate::domain::{EventCandidate, MarkerSet, MarkerType, Position};
use crate::utils::distance;

/// Collapses one trajectory's stop fixes into one marker per stop.
///
/// Stop fixes are chained with the stop-merge distance. A cluster is dropped when a turn
/// candidate sits on it (the vehicle was slowing for the turn) or when it lasts longer than
/// the event window (parked). Each surviving cluster is represented by its first fix.
pub fn condense_stops(stops: &[Position], turns: &[EventCandidate], config: &AnalysisConfig) -> Vec<Position> {
    let markers = &config.markers;
    let overlap_distance = config.detection.turn_merge_distance;

    let mut condensed = Vec::new();
    for group in agglomerate(stops, markers.stop_merge_distance) {
        let (first, last) = (&group[0], &group[group.len() - 1]);

        let overlaps_turn = group
            .iter()
            .cartesian_product(turns.iter())
            .any(|(stop, turn)| distance(stop, &turn.position) < overlap_distance);
        if overlaps_turn {
            if DF.log_stop_condensation {
                log::debug!("stop cluster of {} fixes at {} belongs to a turn", group.len(), first.timestamp);
            }
            continue;
        }

        let span = Seconds::between(first.timestamp, last.timestamp);
        if span > markers.max_event_duration {
            if DF.log_stop_condensation {
                log::debug!("stop cluster of {} fixes at {} lasted {}: parked", group.len(), first.timestamp, span);
            }
            continue;
        }

        condensed.push(*first);
    }

    condensed
}

/// Resolves conflicting markers across every trajectory.
///
/// All candidates are tagged and scanned pairwise, earlier against later. Pairs further apart
/// than `threshold` are left alone. Within range: of two stops the later goes, a stop next to
/// a turn goes, and of two turns of the same kind the later goes. Turns of different kinds
/// both stay. Survivors keep their relative order within their list.
pub fn reconcile(markers: MarkerSet, threshold: Miles) -> MarkerSet {
    let candidates = markers.candidates();
    let n = candidates.len();
    let mut ignored = vec![false; n];

    for i in 0..n {
        if ignored[i] {
            continue;
        }
        for j in (i + 1)..n {
            if ignored[j] {
                continue;
            }
            let (a, b) = (&candidates[i], &candidates[j]);
            if distance(&a.position, &b.position) > threshold {
                continue;
            }

            match (a.marker_type, b.marker_type) {
                (MarkerType::Stop, MarkerType::Stop) => ignored[j] = true,
                (MarkerType::Stop, _) => {
                    ignored[i] = true;
                    log_decision(a, b);
                    // `a` is gone, nothing left for it to suppress
                    break;
                }
                (_, MarkerType::Stop) => ignored[j] = true,
                (turn_a, turn_b) if turn_a == turn_b => ignored[j] = true,
                _ => continue,
            }
            log_decision(a, b);
        }
    }

    let removed = ignored.iter().filter(|&&flag| flag).count();
    if removed > 0 {
        log::info!("reconcile: dropped {} of {} markers within {}", removed, n, threshold);
    }

    candidates
        .into_iter()
        .zip(ignored)
        .filter_map(|(candidate, is_ignored)| (!is_ignored).then_some(candidate))
        .collect()
}

fn log_decision(a: &EventCandidate, b: &EventCandidate) {
    if DF.log_reconciler {
        log::debug!(
            "reconcile: {} @ ({:.6}, {:.6}) vs {} @ ({:.6}, {:.6})",
            a.marker_type,
            a.position.latitude,
            a.position.longitude,
            b.marker_type,
            b.position.latitude,
            b.position.longitude
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mph, constants};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const LAT_PER_MILE: f64 = 1.0 / 69.09;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 3, 19, 14, 0, 0).unwrap()
    }

    /// Fix `north` miles up a straight road, `secs` into the trip.
    fn at(north: f64, secs: i64) -> Position {
        Position::new(42.0 + north * LAT_PER_MILE, -83.0, Some(Mph::new(0.0)), t0() + Duration::seconds(secs))
    }

    fn threshold() -> Miles {
        constants::markers::RECONCILE_DISTANCE
    }

    #[test]
    fn stop_near_left_turn_is_dropped() {
        let markers = MarkerSet {
            stops: vec![at(0.0, 0)],
            left_turns: vec![at(0.02, 10)],
            ..Default::default()
        };
        let out = reconcile(markers, threshold());
        assert!(out.stops.is_empty());
        assert_eq!(out.left_turns, vec![at(0.02, 10)]);
    }

    #[test]
    fn distant_same_turns_both_survive() {
        let markers = MarkerSet {
            left_turns: vec![at(0.0, 0), at(0.3, 100)],
            ..Default::default()
        };
        let out = reconcile(markers.clone(), threshold());
        assert_eq!(out, markers);
    }

    #[test]
    fn near_same_turns_keep_the_earlier() {
        let markers = MarkerSet {
            right_turns: vec![at(0.0, 0), at(0.01, 100), at(0.5, 200)],
            ..Default::default()
        };
        let out = reconcile(markers, threshold());
        assert_eq!(out.right_turns, vec![at(0.0, 0), at(0.5, 200)]);
    }

    #[test]
    fn near_different_turns_both_survive() {
        let markers = MarkerSet {
            left_turns: vec![at(0.0, 0)],
            right_turns: vec![at(0.01, 20)],
            u_turns: vec![at(0.02, 40)],
            ..Default::default()
        };
        let out = reconcile(markers.clone(), threshold());
        assert_eq!(out, markers);
    }

    #[test]
    fn near_stops_keep_the_earlier() {
        let markers = MarkerSet {
            stops: vec![at(0.0, 0), at(0.03, 60), at(1.0, 600)],
            ..Default::default()
        };
        let out = reconcile(markers, threshold());
        assert_eq!(out.stops, vec![at(0.0, 0), at(1.0, 600)]);
    }

    #[test]
    fn ignored_stop_no_longer_suppresses_others() {
        // stop A absorbs stop B; the turn then removes A. B stays removed.
        let markers = MarkerSet {
            stops: vec![at(0.0, 0), at(0.04, 30)],
            u_turns: vec![at(0.01, 50)],
            ..Default::default()
        };
        let out = reconcile(markers, threshold());
        assert!(out.stops.is_empty());
        assert_eq!(out.u_turns.len(), 1);
    }

    #[test]
    fn distance_at_threshold_still_conflicts() {
        let a = at(0.0, 0);
        let b = at(0.02, 10);
        let d = distance(&a, &b);
        let markers = MarkerSet {
            stops: vec![a, b],
            ..Default::default()
        };
        assert_eq!(reconcile(markers, d).stops, vec![a]);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let markers = MarkerSet {
            stops: vec![at(0.0, 0), at(0.02, 5), at(0.2, 50), at(0.9, 300)],
            left_turns: vec![at(0.21, 60), at(0.23, 70), at(0.6, 200)],
            right_turns: vec![at(0.22, 65), at(0.61, 210)],
            u_turns: vec![at(0.9, 310)],
        };
        let once = reconcile(markers, threshold());
        let twice = reconcile(once.clone(), threshold());
        assert_eq!(once, twice);
        assert_eq!(once.stops, vec![at(0.0, 0)]);
        assert_eq!(once.left_turns, vec![at(0.21, 60), at(0.6, 200)]);
        assert_eq!(once.right_turns.len(), 2);
    }

    #[test]
    fn empty_pool_stays_empty() {
        assert!(reconcile(MarkerSet::default(), threshold()).is_empty());
    }

    #[test]
    fn condense_keeps_first_fix_of_each_cluster() {
        let stops: Vec<Position> = (0..10).map(|i| at(0.0, i * 6)).chain([at(1.0, 400), at(1.001, 405)]).collect();
        let out = condense_stops(&stops, &[], &AnalysisConfig::default());
        assert_eq!(out, vec![at(0.0, 0), at(1.0, 400)]);
    }

    #[test]
    fn condense_drops_cluster_under_a_turn() {
        let stops: Vec<Position> = (0..6).map(|i| at(i as f64 * 0.005, i * 8)).collect();
        let turns = vec![EventCandidate::new(MarkerType::LeftTurn, stops[3])];
        assert!(condense_stops(&stops, &turns, &AnalysisConfig::default()).is_empty());

        // The same turn half a mile away leaves the cluster alone
        let far = vec![EventCandidate::new(MarkerType::LeftTurn, at(0.5, 100))];
        assert_eq!(condense_stops(&stops, &far, &AnalysisConfig::default()), vec![stops[0]]);
    }

    #[test]
    fn condense_drops_parked_cluster() {
        let stops: Vec<Position> = (0..11).map(|i| at(0.0, i * 31)).collect();
        assert!(condense_stops(&stops, &[], &AnalysisConfig::default()).is_empty());
    }
}
