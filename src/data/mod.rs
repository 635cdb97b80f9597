// Trajectory sources and result sinks
mod json;
mod kml;
mod loader;
mod nmea;

pub use json::write_json;
pub use kml::write_kml;
pub use loader::load_trajectory;
pub use nmea::{NmeaError, NmeaReader, NmeaStats};
