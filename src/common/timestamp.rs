//! Lenient ISO-8601 parsing for ingested timestamps.
//!
//! Sensor firmware and scripts send either RFC 3339 (`2024-01-01T00:00:00Z`,
//! `...+02:00`) or a bare local-less form (`2024-01-01T00:00:00.123`). Values
//! with an offset are normalised to UTC; values without one are taken as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// Parse a wire timestamp into UTC.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `#[serde(deserialize_with = "...")]` adapter around [`parse_utc`].
pub fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp: {raw:?}")))
}
