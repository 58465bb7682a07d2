//! Consensus timestamp helpers
//!
//! The mirror node reports timestamps as `"seconds.nanoseconds"` strings and
//! accepts the same shape in range filters. Users type dates as ISO strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};

/// Render a `"seconds.nanos"` consensus timestamp as ISO-8601 UTC with milliseconds
pub fn convert_timestamp_to_utc(timestamp: &str) -> Result<String> {
    let invalid = || Error::InvalidDate(timestamp.to_string());

    let (seconds, nanos) = timestamp.trim().split_once('.').unwrap_or((timestamp.trim(), "0"));
    let seconds: i64 = seconds.parse().map_err(|_| invalid())?;
    if nanos.is_empty() || nanos.len() > 9 || !nanos.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    // fractional part is right-padded so "5" means 500ms
    let nanos: u64 = format!("{:0<9}", nanos).parse().map_err(|_| invalid())?;
    let millis = seconds
        .checked_mul(1000)
        .and_then(|ms| ms.checked_add(((nanos as f64) / 1_000_000.0).round() as i64))
        .ok_or_else(invalid)?;

    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(invalid)
}

/// Parse a user-supplied date into Unix seconds with microsecond precision
///
/// Accepts RFC 3339 (`2025-02-05T14:14:14.144Z`), a naive date-time
/// interpreted as UTC, or a bare `YYYY-MM-DD` date (UTC midnight).
pub fn convert_string_to_timestamp(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
        .ok_or_else(|| Error::InvalidDate(input.to_string()))?;

    let seconds = parsed.timestamp_millis() as f64 / 1000.0;
    Ok((seconds * 1_000_000.0).round() / 1_000_000.0)
}

/// Format Unix seconds as a mirror-node timestamp filter value
pub fn to_mirror_timestamp(seconds: f64) -> String {
    format!("{:.6}", seconds)
}
