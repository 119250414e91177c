//! Time windows and wall-clock helpers.
//!
//! Production records are stamped with the plant's wall clock, so the engine
//! works with [`NaiveDateTime`] throughout. Offsets supplied by clients are
//! folded into naive UTC on parse.

use chrono::{DateTime, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Seconds in one hour, used for ideal cycle time conversions.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Raised when a window's start is not strictly before its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid time range: start {start} must be before end {end}")]
pub struct InvalidRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A half-open time window `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Create a window, rejecting empty or inverted ranges.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, InvalidRange> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(InvalidRange { start, end })
        }
    }

    /// Bounds already known to be ordered (bucket partitioning).
    pub(crate) fn from_ordered(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(start < end);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Window length in (fractional) seconds.
    pub fn duration_seconds(&self) -> f64 {
        seconds_between(self.start, self.end)
    }

    /// Whether `ts` falls inside `[start, end)`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// Signed number of seconds from `start` to `end`, with sub-second precision.
pub fn seconds_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta = end - start;
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => delta.num_seconds() as f64,
    }
}

/// Truncate a timestamp down to the start of its hour.
pub fn truncate_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_hms_opt(ts.hour(), 0, 0).unwrap_or(ts)
}

/// Parse an ISO-8601 timestamp as sent by dashboards.
///
/// Accepts naive forms (`2024-03-01T08:00`, `2024-03-01T08:00:00.000`,
/// `2024-03-01 08:00:00`) and RFC 3339 with `Z` or an offset, which is
/// converted to naive UTC.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, String> {
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    let trimmed = input.trim();
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.naive_utc())
        .map_err(|e| format!("Invalid timestamp '{}': {}", input, e))
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
