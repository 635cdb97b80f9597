use geo::{Bearing, Distance, Haversine, Point};
use thiserror::Error;

use crate::config::constants::METERS_PER_MILE;
use crate::config::{Degrees, Miles};
use crate::domain::{Located, Position};

/// Geometry asked of a degenerate input. Always a contract violation by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("bearing is undefined between coincident points ({latitude}, {longitude})")]
    CoincidentPoints { latitude: f64, longitude: f64 },

    #[error("operation needs at least one position")]
    EmptyInput,
}

#[inline]
fn point(p: &Position) -> Point<f64> {
    Point::new(p.longitude, p.latitude)
}

/// Great-circle distance between two fixes. Symmetric, and exactly zero for identical coordinates.
#[inline]
pub fn distance(a: &Position, b: &Position) -> Miles {
    Miles::new(Haversine::distance(point(a), point(b)) / METERS_PER_MILE)
}

/// Initial compass bearing from `a` to `b`, in `[0, 360)`.
pub fn bearing(a: &Position, b: &Position) -> Result<Degrees, GeometryError> {
    if a.same_spot(b) {
        return Err(GeometryError::CoincidentPoints {
            latitude: a.latitude,
            longitude: a.longitude,
        });
    }

    let deg = Haversine::bearing(point(a), point(b)).rem_euclid(360.0);
    // rem_euclid can round a tiny negative angle up to exactly 360.0
    Ok(Degrees::new(if deg >= 360.0 { 0.0 } else { deg }))
}

/// Signed rotation from `from` to `to`, normalized to `(-180, 180]`.
/// Positive is clockwise, i.e. a right turn.
pub fn bearing_difference(from: Degrees, to: Degrees) -> Degrees {
    let diff = (to.value() - from.value()).rem_euclid(360.0);
    Degrees::new(if diff > 180.0 { diff - 360.0 } else { diff })
}

/// Arithmetic mean of the coordinates, as (latitude, longitude).
pub fn centroid<T: Located>(items: &[T]) -> Result<(f64, f64), GeometryError> {
    if items.is_empty() {
        return Err(GeometryError::EmptyInput);
    }
    let n = items.len() as f64;
    let (lat_sum, lon_sum) = items.iter().fold((0.0, 0.0), |(lat, lon), item| {
        let p = item.position();
        (lat + p.latitude, lon + p.longitude)
    });
    Ok((lat_sum / n, lon_sum / n))
}
