//! Unit newtypes shared by the whole pipeline (Immutable Blueprints)

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Great-circle distance in statute miles.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Miles(f64);

impl Miles {
    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Miles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} mi", self.0)
    }
}

/// Ground speed in miles per hour.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Mph(f64);

impl Mph {
    /// 1 knot = this many mph
    pub const PER_KNOT: f64 = 1.15078;

    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    pub fn from_knots(knots: f64) -> Self {
        Self(knots * Self::PER_KNOT)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Mph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} mph", self.0)
    }
}

/// Rate of speed change, in mph gained (or lost) per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct MphPerSec(f64);

impl MphPerSec {
    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for MphPerSec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} mph/s", self.0)
    }
}

/// Compass angle or signed angular difference, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Degrees(f64);

impl Degrees {
    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn abs(self) -> f64 {
        self.0.abs()
    }
}

impl std::fmt::Display for Degrees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// Elapsed time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Seconds(f64);

impl Seconds {
    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Signed span between two instants (later minus earlier), millisecond precision.
    pub fn between(earlier: chrono::DateTime<chrono::Utc>, later: chrono::DateTime<chrono::Utc>) -> Self {
        Self((later - earlier).num_milliseconds() as f64 / 1000.0)
    }
}

impl std::fmt::Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}s", self.0)
    }
}

/// Which member of a turn segment gets recorded as the turn marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, Default)]
pub enum TurnRepresentative {
    /// Member closest to the segment centroid. Robust against a single noisy fix.
    #[default]
    #[strum(to_string = "Medoid")]
    Medoid,
    /// Member closest in time to the middle of the segment.
    #[strum(to_string = "Temporal Midpoint")]
    TemporalMidpoint,
}
