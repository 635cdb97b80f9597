// Top Level Constants

/// `geo` measures in meters; everything else here is in miles.
pub const METERS_PER_MILE: f64 = 1609.344;

pub mod sanitizer {
    use crate::config::{Mph, MphPerSec, SanitizerSettings};

    /// Below this a fix at either end of the trip counts as warm-up / cool-down.
    pub const MOVING_SPEED: Mph = Mph::new(1.0);
    pub const ACCELERATION_LIMIT: MphPerSec = MphPerSec::new(15.0);
    pub const DECELERATION_LIMIT: MphPerSec = MphPerSec::new(15.0);

    pub const DEFAULT: SanitizerSettings = SanitizerSettings {
        moving_speed: MOVING_SPEED,
        acceleration_limit: ACCELERATION_LIMIT,
        deceleration_limit: DECELERATION_LIMIT,
    };
}

pub mod detection {
    use crate::config::{Degrees, DetectionSettings, Miles, Mph, TurnRepresentative};

    pub const SLOW_SPEED: Mph = Mph::new(20.0);
    pub const TURN_MERGE_DISTANCE: Miles = Miles::new(0.01);
    pub const TURN_BEARING_THRESHOLD: Degrees = Degrees::new(20.0);
    // Fewer fixes than this and the first/last bearings are mostly GPS jitter.
    pub const MIN_TURN_SEGMENT_LEN: usize = 5;

    pub const DEFAULT: DetectionSettings = DetectionSettings {
        slow_speed: SLOW_SPEED,
        turn_merge_distance: TURN_MERGE_DISTANCE,
        turn_bearing_threshold: TURN_BEARING_THRESHOLD,
        min_turn_segment_len: MIN_TURN_SEGMENT_LEN,
        turn_representative: TurnRepresentative::Medoid,
    };
}

pub mod markers {
    use crate::config::{MarkerSettings, Miles, Seconds};

    pub const STOP_MERGE_DISTANCE: Miles = Miles::new(0.05);
    pub const RECONCILE_DISTANCE: Miles = Miles::new(0.05);
    // A slow segment longer than this is parked, not stopping or turning.
    pub const MAX_EVENT_DURATION: Seconds = Seconds::new(300.0);

    pub const DEFAULT: MarkerSettings = MarkerSettings {
        stop_merge_distance: STOP_MERGE_DISTANCE,
        reconcile_distance: RECONCILE_DISTANCE,
        max_event_duration: MAX_EVENT_DURATION,
        condense_stops: true,
    };
}

pub mod kml {
    // aabbggrr, the channel order KML uses
    pub const LINE_COLOR: &str = "af00ffff";
    pub const LINE_WIDTH: u32 = 6;
    pub const POLY_COLOR: &str = "7f00ff00";
    pub const DOCUMENT_NAME: &str = "GPS Cost Map";
}
