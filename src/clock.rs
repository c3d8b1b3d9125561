//! Timestamp helpers
//!
//! Stored timestamps are Unix milliseconds; operators type RFC 3339.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{HackulusError, Result};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse an RFC 3339 timestamp (e.g. `2026-03-01T09:00:00+05:30`) into milliseconds.
pub fn parse_timestamp(field: &str, text: &str) -> Result<i64> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| HackulusError::invalid(field, format!("'{}' is not an RFC 3339 timestamp: {}", text, e)))
}

/// Render milliseconds as an RFC 3339 UTC string.
pub fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ms.to_string())
}
