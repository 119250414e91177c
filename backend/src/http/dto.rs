//! Data Transfer Objects for the HTTP API.
//!
//! Summaries are serialized directly from [`crate::models`]; the types here
//! cover requests and the small responses specific to the HTTP layer.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

pub use crate::models::{BucketSummary, ModelSummary, RangeSummary, ShiftWindow};
pub use crate::services::{OeeReport, SubscriptionInfo};

use super::error::{ApiError, AppError};
use crate::models::parse_timestamp;

/// Time range of a query, from the query string or a WebSocket frame.
///
/// Timestamps are ISO-8601; a missing `end_time` means "now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub end_time: Option<NaiveDateTime>,
}

impl RangeQuery {
    /// Range end, resolving "now" against `now`.
    pub fn resolve_end(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.end_time.unwrap_or(now)
    }

    /// Resolve the range against `now` and reject ranges longer than `max_range`.
    ///
    /// Ordering is left to the query services, which report `INVALID_RANGE`.
    pub fn resolve(
        &self,
        now: NaiveDateTime,
        max_range: Duration,
    ) -> Result<(NaiveDateTime, NaiveDateTime), AppError> {
        let end = self.resolve_end(now);
        if end.signed_duration_since(self.start_time) > max_range {
            return Err(AppError::BadRequest(format!(
                "Range from {} to {} exceeds the {} hour limit",
                self.start_time,
                end,
                max_range.num_hours()
            )));
        }
        Ok((self.start_time, end))
    }
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(raw) if !raw.trim().is_empty() => parse_timestamp(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Active push subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<SubscriptionInfo>,
    pub total: usize,
}

/// Frame pushed when a WebSocket query fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorFrame {
    pub error: ApiError,
}
