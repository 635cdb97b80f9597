use std::io::BufRead;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;

use crate::config::Mph;
use crate::domain::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NmeaError {
    #[error("checksum mismatch: sentence says {expected:02X}, computed {computed:02X}")]
    ChecksumMismatch { expected: u8, computed: u8 },

    #[error("unreadable checksum '{0}'")]
    BadChecksum(String),

    #[error("sentence has {0} fields, RMC needs at least 10")]
    TooFewFields(usize),

    #[error("invalid {field} '{value}'")]
    InvalidField { field: &'static str, value: String },
}

impl NmeaError {
    fn invalid(field: &'static str, value: &str) -> Self {
        NmeaError::InvalidField {
            field,
            value: value.to_string(),
        }
    }
}

/// What happened to each line of one NMEA log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NmeaStats {
    pub lines: usize,
    pub parsed: usize,
    /// Blank lines, other sentence types and void (status `V`) fixes
    pub ignored: usize,
    pub malformed: usize,
}

/// Line-oriented reader for `$GPRMC` / `$GNRMC` logs.
#[derive(Debug, Default)]
pub struct NmeaReader {
    stats: NmeaStats,
}

impl NmeaReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> NmeaStats {
        self.stats
    }

    /// Reads every line. Only I/O failures are errors; bad sentences are counted and skipped.
    pub fn read<R: BufRead>(&mut self, reader: R) -> Result<Vec<Position>> {
        let mut positions = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("reading NMEA line {}", line_no + 1))?;
            self.stats.lines += 1;

            match Self::parse_line(&line) {
                Ok(Some(position)) => {
                    self.stats.parsed += 1;
                    positions.push(position);
                }
                Ok(None) => self.stats.ignored += 1,
                Err(e) => {
                    self.stats.malformed += 1;
                    log::debug!("NMEA line {} skipped: {}", line_no + 1, e);
                }
            }
        }

        Ok(positions)
    }

    /// Parses one sentence.
    ///
    /// `Ok(None)` for anything that is not an active RMC fix. The `*hh` checksum is verified
    /// when present. An empty speed field gives a fix of unknown speed.
    pub fn parse_line(line: &str) -> Result<Option<Position>, NmeaError> {
        let line = line.trim();
        let Some(body) = line.strip_prefix('$') else {
            return Ok(None);
        };

        let payload = match body.split_once('*') {
            Some((payload, checksum)) => {
                verify_checksum(payload, checksum)?;
                payload
            }
            None => body,
        };

        let fields: Vec<&str> = payload.split(',').collect();
        if !matches!(fields[0], "GPRMC" | "GNRMC") {
            return Ok(None);
        }
        if fields.len() < 10 {
            return Err(NmeaError::TooFewFields(fields.len()));
        }
        if fields[2] != "A" {
            return Ok(None);
        }

        let latitude = parse_coordinate(fields[3], fields[4], 2, "latitude")?;
        let longitude = parse_coordinate(fields[5], fields[6], 3, "longitude")?;

        let speed = match fields[7] {
            "" => None,
            knots => Some(Mph::from_knots(
                knots.parse::<f64>().map_err(|_| NmeaError::invalid("speed", knots))?,
            )),
        };

        let timestamp = parse_timestamp(fields[1], fields[9])?;

        Ok(Some(Position::new(latitude, longitude, speed, timestamp)))
    }
}

fn verify_checksum(payload: &str, checksum: &str) -> Result<(), NmeaError> {
    let expected =
        u8::from_str_radix(checksum.trim(), 16).map_err(|_| NmeaError::BadChecksum(checksum.to_string()))?;
    let computed = payload.bytes().fold(0u8, |acc, b| acc ^ b);
    if expected != computed {
        return Err(NmeaError::ChecksumMismatch { expected, computed });
    }
    Ok(())
}

/// `ddmm.mmmm` (or `dddmm.mmmm`) plus hemisphere into signed decimal degrees.
fn parse_coordinate(
    value: &str,
    hemisphere: &str,
    degree_digits: usize,
    field: &'static str,
) -> Result<f64, NmeaError> {
    let bad = || NmeaError::invalid(field, value);

    if value.len() < degree_digits + 2 || !value.is_char_boundary(degree_digits) {
        return Err(bad());
    }
    let (deg_str, min_str) = value.split_at(degree_digits);
    let degrees: f64 = deg_str.parse().map_err(|_| bad())?;
    let minutes: f64 = min_str.parse().map_err(|_| bad())?;
    if !(0.0..60.0).contains(&minutes) {
        return Err(bad());
    }

    let magnitude = degrees + minutes / 60.0;
    match (field, hemisphere) {
        ("latitude", "N") | ("longitude", "E") => Ok(magnitude),
        ("latitude", "S") | ("longitude", "W") => Ok(-magnitude),
        _ => Err(NmeaError::invalid("hemisphere", hemisphere)),
    }
}

/// `hhmmss[.sss]` and `ddmmyy` into UTC. Two-digit years pivot at 80.
fn parse_timestamp(time: &str, date: &str) -> Result<DateTime<Utc>, NmeaError> {
    let bad_time = || NmeaError::invalid("time", time);
    let bad_date = || NmeaError::invalid("date", date);

    let (whole, fraction) = time.split_once('.').unwrap_or((time, ""));
    if whole.len() != 6 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_time());
    }
    let hour: u32 = whole[0..2].parse().map_err(|_| bad_time())?;
    let minute: u32 = whole[2..4].parse().map_err(|_| bad_time())?;
    let second: u32 = whole[4..6].parse().map_err(|_| bad_time())?;
    let millis = if fraction.is_empty() {
        0
    } else {
        let frac: f64 = format!("0.{}", fraction).parse().map_err(|_| bad_time())?;
        ((frac * 1000.0).round() as u32).min(999)
    };

    if date.len() != 6 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_date());
    }
    let day: u32 = date[0..2].parse().map_err(|_| bad_date())?;
    let month: u32 = date[2..4].parse().map_err(|_| bad_date())?;
    let yy: i32 = date[4..6].parse().map_err(|_| bad_date())?;
    let year = if yy >= 80 { 1900 + yy } else { 2000 + yy };

    let naive_date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad_date)?;
    let naive_time = NaiveTime::from_hms_milli_opt(hour, minute, second, millis).ok_or_else(bad_time)?;
    Ok(Utc.from_utc_datetime(&naive_date.and_time(naive_time)))
}
