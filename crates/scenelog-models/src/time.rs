//! Timestamp helpers.
//!
//! All instants in the system are timezone-aware UTC. Naive input
//! timestamps are taken as UTC wall-clock at face value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Start of the current UTC day.
pub fn today_start() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Parse a timestamp, normalizing to UTC.
///
/// Accepts RFC 3339 (offset is converted to UTC), naive datetimes
/// (`2024-06-01T12:00:00`, with or without fractional seconds, `T` or
/// space separated) interpreted as UTC, and bare dates (midnight UTC).
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }

    None
}
