use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Mph;

/// A single GPS fix. Bearings are derived from neighbouring fixes, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// `None` when the source sentence carried no usable speed.
    pub speed: Option<Mph>,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, speed: Option<Mph>, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            speed,
            timestamp,
        }
    }

    /// True when the coordinates are finite and inside the WGS84 ranges.
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Identical coordinates. Bearing is undefined between two such fixes.
    #[inline]
    pub fn same_spot(&self, other: &Position) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }

    /// Known speed strictly below `limit`. Unknown speed is never "below".
    #[inline]
    pub fn is_slower_than(&self, limit: Mph) -> bool {
        self.speed.is_some_and(|s| s < limit)
    }

    // (longitude, latitude), the axis order KML and GeoJSON expect
    pub fn lon_lat(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}

/// Anything that sits at a position: raw fixes and tagged event candidates.
pub trait Located {
    fn position(&self) -> &Position;
}

impl Located for Position {
    #[inline]
    fn position(&self) -> &Position {
        self
    }
}

impl<T: Located> Located for &T {
    #[inline]
    fn position(&self) -> &Position {
        (*self).position()
    }
}

/// One recorded trip, in the order the fixes were reported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    /// Where the fixes came from (usually the file name). Only used for reporting.
    pub label: String,
    pub positions: Vec<Position>,
}

impl Trajectory {
    pub fn new(label: impl Into<String>, positions: Vec<Position>) -> Self {
        Self {
            label: label.into(),
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl From<Vec<Position>> for Trajectory {
    fn from(positions: Vec<Position>) -> Self {
        Self::new("trajectory", positions)
    }
}
