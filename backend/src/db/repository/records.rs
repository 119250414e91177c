//! Record repository trait: the data-store side of every OEE query.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{RawRecord, TimeWindow};

/// Repository trait for reading raw production records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Check if the data store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the connection is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch the records logged for `unit` within `[window.start, window.end)`.
    ///
    /// Ordering is unspecified. Unknown units yield an empty vector, not an
    /// error.
    ///
    /// # Returns
    /// * `Ok(Vec<RawRecord>)` - Records inside the window
    /// * `Err(RepositoryError)` - If the data store is unavailable or the query fails
    async fn fetch_records(&self, unit: &str, window: &TimeWindow)
        -> RepositoryResult<Vec<RawRecord>>;
}
