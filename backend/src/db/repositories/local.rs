//! In-memory local repository implementation.
//!
//! Stores production records per unit in memory, suitable for unit tests,
//! demos and local development. A JSON seed file can pre-populate it.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{RawRecord, StoredRecord, TimeWindow};

/// In-memory local repository.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use oee_rust::db::repositories::LocalRepository;
/// use oee_rust::models::RawRecord;
///
/// let repo = LocalRepository::new();
/// let at = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(8, 5, 0).unwrap();
/// repo.insert("LINE-1", at, RawRecord::pass("A", Some(100.0)));
/// assert_eq!(repo.record_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    /// Records per unit, kept in insertion order.
    records: BTreeMap<String, Vec<StoredRecord>>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = StoredRecord>) -> Self {
        let repo = Self::new();
        repo.extend(records);
        repo
    }

    /// Load a JSON seed file containing an array of [`StoredRecord`]s.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read seed file {}: {}",
                path.display(),
                e
            ))
        })?;
        let records: Vec<StoredRecord> = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to parse seed file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            "Seeded local repository with {} records from {}",
            records.len(),
            path.display()
        );
        Ok(Self::with_records(records))
    }

    /// Log one record for a unit.
    pub fn insert(&self, unit: &str, recorded_at: chrono::NaiveDateTime, record: RawRecord) {
        self.extend(std::iter::once(StoredRecord::new(unit, recorded_at, record)));
    }

    /// Log many records.
    pub fn extend(&self, records: impl IntoIterator<Item = StoredRecord>) {
        let mut data = self.data.write();
        for record in records {
            data.records
                .entry(record.unit.clone())
                .or_default()
                .push(record);
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Total number of records stored across units.
    pub fn record_count(&self) -> usize {
        self.data.read().records.values().map(Vec::len).sum()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_records(
        &self,
        unit: &str,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<RawRecord>> {
        self.check_health("fetch_records")
            .map_err(|e| e.for_unit(unit))?;

        let data = self.data.read();
        let records = data
            .records
            .get(unit)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|r| window.contains(r.recorded_at))
                    .map(|r| r.record.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }
}

#[async_trait]
impl UnitRepository for LocalRepository {
    async fn list_units(&self) -> RepositoryResult<Vec<String>> {
        self.check_health("list_units")?;
        // BTreeMap keys are already sorted.
        Ok(self.data.read().records.keys().cloned().collect())
    }
}
