//! Textual timestamp handling.
//!
//! All scheduling arithmetic uses [`NaiveDateTime`]. Inputs are accepted in
//! a handful of ISO-8601 shapes; outputs are always rendered as
//! `yyyy-mm-dd HH:MM:SS`.
//!
//! Timestamps carrying a UTC offset are converted to UTC and the offset is
//! dropped, so every comparison happens on one zone-free calendar.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serializer};

use crate::error::{ReflowError, Result};

/// Output pattern for every rendered timestamp.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a textual timestamp.
///
/// # Errors
/// [`ReflowError::InvalidTimestamp`] if no supported shape matches.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ReflowError::InvalidTimestamp(value.to_string()))
}

/// Renders a timestamp as `yyyy-mm-dd HH:MM:SS`.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Serde adapter: lenient parsing in, fixed pattern out.
///
/// Use with `#[serde(with = "crate::models::timestamp")]`.
pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(value))
}

/// See [`serialize`].
pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(de::Error::custom)
}
