use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use super::position::{Located, Position};

// Variant order is also the order candidates are concatenated in for reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
pub enum MarkerType {
    #[strum(to_string = "Stop")]
    Stop,
    #[strum(to_string = "Left Turn")]
    LeftTurn,
    #[strum(to_string = "Right Turn")]
    RightTurn,
    #[strum(to_string = "U-Turn")]
    UTurn,
}

/// A detected, not yet reconciled event: a fix plus what happened there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventCandidate {
    pub marker_type: MarkerType,
    pub position: Position,
}

impl EventCandidate {
    pub fn new(marker_type: MarkerType, position: Position) -> Self {
        Self {
            marker_type,
            position,
        }
    }
}

impl Located for EventCandidate {
    #[inline]
    fn position(&self) -> &Position {
        &self.position
    }
}

/// The four marker lists handed to the renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerSet {
    pub stops: Vec<Position>,
    pub left_turns: Vec<Position>,
    pub right_turns: Vec<Position>,
    pub u_turns: Vec<Position>,
}

impl MarkerSet {
    pub fn list(&self, marker_type: MarkerType) -> &[Position] {
        match marker_type {
            MarkerType::Stop => &self.stops,
            MarkerType::LeftTurn => &self.left_turns,
            MarkerType::RightTurn => &self.right_turns,
            MarkerType::UTurn => &self.u_turns,
        }
    }

    fn list_mut(&mut self, marker_type: MarkerType) -> &mut Vec<Position> {
        match marker_type {
            MarkerType::Stop => &mut self.stops,
            MarkerType::LeftTurn => &mut self.left_turns,
            MarkerType::RightTurn => &mut self.right_turns,
            MarkerType::UTurn => &mut self.u_turns,
        }
    }

    pub fn push(&mut self, candidate: EventCandidate) {
        self.list_mut(candidate.marker_type).push(candidate.position);
    }

    /// Appends another set list by list (concatenation of per-trajectory results).
    pub fn extend(&mut self, other: MarkerSet) {
        self.stops.extend(other.stops);
        self.left_turns.extend(other.left_turns);
        self.right_turns.extend(other.right_turns);
        self.u_turns.extend(other.u_turns);
    }

    /// All markers tagged with their type: stops first, then left, right and U-turns.
    pub fn candidates(&self) -> Vec<EventCandidate> {
        MarkerType::iter()
            .flat_map(|marker_type| {
                self.list(marker_type)
                    .iter()
                    .map(move |&position| EventCandidate::new(marker_type, position))
            })
            .collect()
    }

    pub fn count(&self, marker_type: MarkerType) -> usize {
        self.list(marker_type).len()
    }

    pub fn total(&self) -> usize {
        MarkerType::iter().map(|t| self.count(t)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl FromIterator<EventCandidate> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = EventCandidate>>(iter: I) -> Self {
        let mut set = MarkerSet::default();
        for candidate in iter {
            set.push(candidate);
        }
        set
    }
}
