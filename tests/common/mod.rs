//! Synthetic trips for the scenario tests.
//!
//! Distances are laid out in miles on a local north/east grid around (42, -83), which is
//! accurate to well under a percent over the few tenths of a mile these trips cover.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use gps_cost_map::config::Mph;
use gps_cost_map::{Position, Trajectory};

pub const ORIGIN_LAT: f64 = 42.0;
pub const ORIGIN_LON: f64 = -83.0;
pub const LAT_PER_MILE: f64 = 1.0 / 69.09;
pub const LON_PER_MILE: f64 = 1.0 / 51.34;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 3, 19, 14, 0, 0).unwrap()
}

/// Builds a trip fix by fix: every fix moves the cursor, then records where it is.
pub struct TripBuilder {
    north: f64,
    east: f64,
    time: DateTime<Utc>,
    positions: Vec<Position>,
}

impl TripBuilder {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            north: 0.0,
            east: 0.0,
            time: start,
            positions: Vec::new(),
        }
    }

    /// Starts `north`/`east` miles from the origin instead of at it.
    pub fn starting_at(mut self, north: f64, east: f64) -> Self {
        self.north = north;
        self.east = east;
        self
    }

    fn emit(&mut self, mph: f64) {
        self.positions.push(Position::new(
            ORIGIN_LAT + self.north * LAT_PER_MILE,
            ORIGIN_LON + self.east * LON_PER_MILE,
            Some(Mph::new(mph)),
            self.time,
        ));
    }

    /// `count` fixes along compass `heading`, each `step` miles and `secs` seconds after the last.
    pub fn drive(mut self, heading: f64, mph: f64, count: usize, step: f64, secs: i64) -> Self {
        let (sin, cos) = heading.to_radians().sin_cos();
        for _ in 0..count {
            self.north += step * cos;
            self.east += step * sin;
            self.time += Duration::seconds(secs);
            self.emit(mph);
        }
        self
    }

    /// `count` fixes on the spot, `secs` seconds apart.
    pub fn hold(mut self, mph: f64, count: usize, secs: i64) -> Self {
        for _ in 0..count {
            self.time += Duration::seconds(secs);
            self.emit(mph);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn build(self, label: &str) -> Trajectory {
        Trajectory::new(label, self.positions)
    }
}

/// Cruise north, slow right-hand corner onto an eastbound road, cruise east.
/// On a fresh builder, fixes 10..16 are the six slow (10 mph) corner fixes.
pub fn through_right_corner(trip: TripBuilder) -> TripBuilder {
    trip.drive(0.0, 30.0, 10, 0.0167, 2)
        .drive(0.0, 10.0, 3, 0.005, 8)
        .drive(90.0, 10.0, 3, 0.005, 8)
        .drive(90.0, 30.0, 10, 0.0167, 2)
}

/// Cruise north, stand still for ten fixes over 54 s, cruise on.
/// On a fresh builder, fix 10 is the first stationary fix.
pub fn through_stop_sign(trip: TripBuilder) -> TripBuilder {
    trip.drive(0.0, 30.0, 10, 0.0167, 2)
        .hold(0.0, 10, 6)
        .drive(0.0, 30.0, 10, 0.025, 3)
}

/// One `$GPRMC` sentence with a valid checksum.
pub fn to_nmea(p: &Position) -> String {
    fn dm(value: f64, degree_digits: usize) -> String {
        let abs = value.abs();
        let degrees = abs.trunc();
        let minutes = (abs - degrees) * 60.0;
        format!("{:0width$}{:07.4}", degrees as u32, minutes, width = degree_digits)
    }

    let knots = p.speed.map(|s| format!("{:.3}", s.value() / Mph::PER_KNOT)).unwrap_or_default();
    let payload = format!(
        "GPRMC,{},A,{},{},{},{},{},0.0,{},,,A",
        p.timestamp.format("%H%M%S%.3f"),
        dm(p.latitude, 2),
        if p.latitude >= 0.0 { "N" } else { "S" },
        dm(p.longitude, 3),
        if p.longitude >= 0.0 { "E" } else { "W" },
        knots,
        p.timestamp.format("%d%m%y"),
    );
    let checksum = payload.bytes().fold(0u8, |acc, b| acc ^ b);
    format!("${}*{:02X}", payload, checksum)
}
