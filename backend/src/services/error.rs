//! Errors raised by the aggregation services.

use chrono::NaiveDateTime;

use crate::db::repository::RepositoryError;
use crate::models::InvalidRange;

/// Failure of a flat or hourly OEE query.
///
/// There is no partial result: either every record needed for the answer was
/// fetched and aggregated, or the whole query fails with one of these.
#[derive(Debug, thiserror::Error)]
pub enum OeeError {
    /// The caller asked for a range whose start is not before its end.
    #[error("invalid time range: start {start} must be before end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// The record store could not be read.
    #[error("data source unavailable: {0}")]
    DataSourceUnavailable(#[from] RepositoryError),
}

impl OeeError {
    /// Whether repeating the same query later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            OeeError::InvalidRange { .. } => false,
            OeeError::DataSourceUnavailable(_) => true,
        }
    }
}

impl From<InvalidRange> for OeeError {
    fn from(err: InvalidRange) -> Self {
        OeeError::InvalidRange {
            start: err.start,
            end: err.end,
        }
    }
}
