//! Analysis and computation configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants;
use super::types::{Degrees, Miles, Mph, MphPerSec, Seconds, TurnRepresentative};

/// Rejected configuration. Raised once, when the config is validated, never mid-pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("turn bearing threshold must lie strictly between 0 and 90 degrees (got {0})")]
    TurnBearingOutOfRange(f64),

    #[error("minimum turn segment length must be at least 2 fixes (got {0})")]
    TurnSegmentTooShort(usize),
}

/// Trip-edge trimming and physical plausibility limits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SanitizerSettings {
    /// Fixes slower than this at the start/end of a trip are trimmed.
    pub moving_speed: Mph,
    pub acceleration_limit: MphPerSec,
    pub deceleration_limit: MphPerSec,
}

impl Default for SanitizerSettings {
    fn default() -> Self {
        constants::sanitizer::DEFAULT
    }
}

/// Settings for the stop/turn scans over one sanitized trajectory
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionSettings {
    /// A fix with a known speed strictly below this is "slow".
    pub slow_speed: Mph,
    /// Chaining distance used to cut slow fixes into turn segments.
    pub turn_merge_distance: Miles,
    /// Minimum bearing change for a turn, and the tolerance around 180° for a U-turn.
    pub turn_bearing_threshold: Degrees,
    pub min_turn_segment_len: usize,
    pub turn_representative: TurnRepresentative,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        constants::detection::DEFAULT
    }
}

/// Settings for merging markers: stop condensation and cross-category reconciliation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkerSettings {
    pub stop_merge_distance: Miles,
    pub reconcile_distance: Miles,
    /// Longest end-to-end span of a stop cluster or turn segment.
    pub max_event_duration: Seconds,
    /// Collapse each trajectory's stop clusters to one marker before reconciliation.
    pub condense_stops: bool,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        constants::markers::DEFAULT
    }
}

/// The Master Analysis Configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    // Sub-groups
    pub sanitizer: SanitizerSettings,
    pub detection: DetectionSettings,
    pub markers: MarkerSettings,

    /// Fan per-trajectory work out over the rayon pool.
    pub parallel: bool,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    sanitizer: constants::sanitizer::DEFAULT,
    detection: constants::detection::DEFAULT,
    markers: constants::markers::DEFAULT,
    parallel: true,
};

impl Default for AnalysisConfig {
    fn default() -> Self {
        ANALYSIS
    }
}

impl AnalysisConfig {
    /// Reads a JSON config. Missing fields keep their defaults, so a file may override a single threshold.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.sanitizer;
        non_negative("sanitizer.moving_speed", s.moving_speed.value())?;
        positive("sanitizer.acceleration_limit", s.acceleration_limit.value())?;
        positive("sanitizer.deceleration_limit", s.deceleration_limit.value())?;

        let d = &self.detection;
        non_negative("detection.slow_speed", d.slow_speed.value())?;
        positive("detection.turn_merge_distance", d.turn_merge_distance.value())?;
        let bearing = d.turn_bearing_threshold.value();
        finite("detection.turn_bearing_threshold", bearing)?;
        if bearing <= 0.0 || bearing >= 90.0 {
            return Err(ConfigError::TurnBearingOutOfRange(bearing));
        }
        if d.min_turn_segment_len < 2 {
            return Err(ConfigError::TurnSegmentTooShort(d.min_turn_segment_len));
        }

        let m = &self.markers;
        positive("markers.stop_merge_distance", m.stop_merge_distance.value())?;
        positive("markers.reconcile_distance", m.reconcile_distance.value())?;
        positive("markers.max_event_duration", m.max_event_duration.value())?;

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value == 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ANALYSIS.validate(), Ok(()));
        assert_eq!(AnalysisConfig::default(), ANALYSIS);
    }

    #[test]
    fn rejects_negative_threshold() {
        let mut config = AnalysisConfig::default();
        config.detection.slow_speed = Mph::new(-5.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "detection.slow_speed",
                value: -5.0
            })
        );
    }

    #[test]
    fn rejects_zero_max_duration() {
        let mut config = AnalysisConfig::default();
        config.markers.max_event_duration = Seconds::new(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "markers.max_event_duration",
                ..
            })
        ));
    }

    #[test]
    fn rejects_nan_and_bad_bearing() {
        let mut config = AnalysisConfig::default();
        config.markers.reconcile_distance = Miles::new(f64::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::NotFinite { .. })));

        let mut config = AnalysisConfig::default();
        config.detection.turn_bearing_threshold = Degrees::new(95.0);
        assert_eq!(config.validate(), Err(ConfigError::TurnBearingOutOfRange(95.0)));

        let mut config = AnalysisConfig::default();
        config.detection.min_turn_segment_len = 1;
        assert_eq!(config.validate(), Err(ConfigError::TurnSegmentTooShort(1)));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "detection": { "slow_speed": 15.0 }, "parallel": false }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.detection.slow_speed, Mph::new(15.0));
        assert_eq!(config.detection.turn_merge_distance, constants::detection::TURN_MERGE_DISTANCE);
        assert_eq!(config.markers, constants::markers::DEFAULT);
        assert!(!config.parallel);
    }
}
