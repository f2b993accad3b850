//! ISO-8601 timestamps as stored on posts and comments.
//!
//! Everything is written in UTC with millisecond precision and a `Z` suffix,
//! so string order and chronological order agree.

use chrono::{DateTime, SecondsFormat, Utc};

pub fn format_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_iso() -> String {
    format_iso(Utc::now())
}

/// Re-render an RFC 3339 string in the canonical stored form.
pub fn canonicalize(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| format_iso(at.with_timezone(&Utc)))
}

/// Convert a seconds/nanoseconds pair (native store timestamp) to ISO-8601.
pub fn from_epoch(seconds: i64, nanoseconds: u32) -> Option<String> {
    DateTime::from_timestamp(seconds, nanoseconds).map(format_iso)
}
