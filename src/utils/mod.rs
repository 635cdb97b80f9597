pub mod geometry;
mod perf;
pub mod time_utils;

pub use geometry::{GeometryError, bearing, bearing_difference, centroid, distance};
pub use time_utils::{format_duration, format_timestamp, span_secs};
