use chrono::{DateTime, Utc};

pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Used for display purposes
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(STANDARD_TIME_FORMAT).to_string()
}

pub fn format_duration(secs: i64) -> String {
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m {}s", mins, secs % 60);
    }
    let hours = mins / 60;
    format!("{}h {}m", hours, mins % 60)
}

/// Wall-clock span of an ordered run of fixes, or zero when it has fewer than two.
pub fn span_secs(first: Option<DateTime<Utc>>, last: Option<DateTime<Utc>>) -> i64 {
    match (first, last) {
        (Some(a), Some(b)) => (b - a).num_seconds(),
        _ => 0,
    }
}
