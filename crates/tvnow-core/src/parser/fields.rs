//! Lenient field parsers for movie items
//!
//! A value that cannot be parsed falls back to a default and logs a
//! warning instead of failing the item.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// Layout of `broadcastStartDate` values, e.g. "2023-05-01 20:15:00"
const PUBLISH_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a `duration` value of the form `HH:MM:SS` into seconds
///
/// # Returns
/// Total seconds, or 0 if the value is missing, not a string, or
/// does not match the pattern
pub fn parse_duration(value: Option<&Value>) -> u64 {
    let Some(text) = value.and_then(Value::as_str) else {
        warn!(value = ?value, "couldn't parse duration: missing or not a string");
        return 0;
    };

    match duration_seconds(text) {
        Some(secs) => secs,
        None => {
            warn!(duration = text, "couldn't parse duration");
            0
        }
    }
}

/// Strict `HH:MM:SS` conversion, each component exactly two digits
fn duration_seconds(text: &str) -> Option<u64> {
    let Ok(re) = Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})$") else {
        return None;
    };

    let caps = re.captures(text)?;
    let hours = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let minutes = caps.get(2)?.as_str().parse::<u64>().ok()?;
    let seconds = caps.get(3)?.as_str().parse::<u64>().ok()?;

    Some(hours * 3600 + minutes * 60 + seconds)
}

/// Parses a `broadcastStartDate` value of the form `yyyy-MM-dd HH:mm:ss`
///
/// The value carries no zone; it is kept as the service's wall-clock time.
/// Text after the seconds (e.g. a fraction like ".0") is ignored.
///
/// # Returns
/// The parsed timestamp, or the Unix epoch if the value is missing or malformed
pub fn parse_publish_date(value: Option<&Value>) -> NaiveDateTime {
    let epoch = DateTime::<Utc>::UNIX_EPOCH.naive_utc();

    let Some(text) = value.and_then(Value::as_str) else {
        warn!(value = ?value, "couldn't parse publish date: missing or not a string");
        return epoch;
    };

    match NaiveDateTime::parse_and_remainder(text.trim_start(), PUBLISH_DATE_FORMAT) {
        Ok((time, _)) => time,
        Err(e) => {
            warn!(date = text, error = %e, "couldn't parse publish date");
            epoch
        }
    }
}
