//! Repository service functions.
//!
//! Thin wrappers over the repository traits that the HTTP layer and the
//! aggregation services call. They take `&dyn` repositories so any backend
//! (SQL Server, in-memory) can be plugged in.

use tracing::debug;

use super::repository::{FullRepository, RecordRepository, RepositoryResult, UnitRepository};
use crate::models::{RawRecord, TimeWindow};

/// Check whether the data store is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    RecordRepository::health_check(repo).await
}

/// List known production units, sorted for stable display.
pub async fn list_units(repo: &dyn FullRepository) -> RepositoryResult<Vec<String>> {
    let mut units = UnitRepository::list_units(repo).await?;
    units.sort();
    units.dedup();
    debug!("Listed {} units", units.len());
    Ok(units)
}

/// Fetch the records a unit logged within `[window.start, window.end)`.
pub async fn fetch_records(
    repo: &dyn FullRepository,
    unit: &str,
    window: &TimeWindow,
) -> RepositoryResult<Vec<RawRecord>> {
    RecordRepository::fetch_records(repo, unit, window).await
}
