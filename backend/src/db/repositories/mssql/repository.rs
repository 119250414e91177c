//! SQL Server repository over the production record log view.

use async_trait::async_trait;
use bb8::{PooledConnection, RunError};
use bb8_tiberius::ConnectionManager;
use tiberius::{Query, Row};
use tracing::{debug, warn};

use super::pool::{build_pool, DbPool};
use crate::db::config::DbConfig;
use crate::db::repository::*;
use crate::models::{RawRecord, TimeWindow};

/// Records with an outcome other than pass (1) or fail (0) are not counted.
const FETCH_RECORDS_SQL: &str = r#"
    SELECT
        Model,
        CAST(TestSonucu AS INT) AS Outcome,
        CAST(ModelSuresiSN AS FLOAT) AS TargetRate
    FROM ProductRecordLogView
    WHERE UnitName = @P1
        AND KayitTarihi >= @P2
        AND KayitTarihi < @P3
        AND TestSonucu IN (0, 1)
"#;

const LIST_UNITS_SQL: &str = r#"
    SELECT DISTINCT UnitName
    FROM ProductRecordLogView
    WHERE UnitName IS NOT NULL
    ORDER BY UnitName
"#;

/// Repository reading from SQL Server.
#[derive(Clone)]
pub struct MssqlRepository {
    pool: DbPool,
}

impl MssqlRepository {
    /// Build a pool for `config` and wrap it.
    pub async fn connect(config: &DbConfig) -> RepositoryResult<Self> {
        let pool = build_pool(config).await.map_err(|e| {
            RepositoryError::connection_with_context(
                e,
                ErrorContext::new("connect").with_details(format!(
                    "server={}:{} database={}",
                    config.server, config.port, config.database
                )),
            )
        })?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(
        &self,
        operation: &str,
    ) -> RepositoryResult<PooledConnection<'_, ConnectionManager>> {
        self.pool.get().await.map_err(|e| match e {
            RunError::TimedOut => RepositoryError::timeout("Timed out waiting for a pooled connection")
                .with_operation(operation),
            RunError::User(err) => RepositoryError::connection_with_context(
                format!("Failed to get connection: {}", err),
                ErrorContext::new(operation),
            ),
        })
    }
}

fn record_from_row(row: &Row) -> RepositoryResult<RawRecord> {
    let model = row
        .try_get::<&str, _>(0)
        .map_err(|e| RepositoryError::validation(format!("Model column: {}", e)))?
        .unwrap_or_default()
        .to_string();
    let outcome = row
        .try_get::<i32, _>(1)
        .map_err(|e| RepositoryError::validation(format!("TestSonucu column: {}", e)))?
        .ok_or_else(|| RepositoryError::validation("TestSonucu is NULL"))?;
    let target_rate = row
        .try_get::<f64, _>(2)
        .map_err(|e| RepositoryError::validation(format!("ModelSuresiSN column: {}", e)))?;

    Ok(RawRecord::new(model, outcome == 1, target_rate))
}

#[async_trait]
impl RecordRepository for MssqlRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let mut conn = match self.conn("health_check").await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("SQL Server health check could not connect: {}", e);
                return Ok(false);
            }
        };

        Query::new("SELECT 1 AS test")
            .query(&mut *conn)
            .await
            .map_err(|e| RepositoryError::query(format!("Health check failed: {}", e)))?
            .into_row()
            .await
            .map_err(|e| RepositoryError::query(format!("Health check failed: {}", e)))?;

        Ok(true)
    }

    async fn fetch_records(
        &self,
        unit: &str,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<RawRecord>> {
        let mut conn = self
            .conn("fetch_records")
            .await
            .map_err(|e| e.for_unit(unit))?;

        let mut query = Query::new(FETCH_RECORDS_SQL);
        query.bind(unit);
        query.bind(window.start());
        query.bind(window.end());

        let rows = query
            .query(&mut *conn)
            .await
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    format!("Failed to fetch records: {}", e),
                    ErrorContext::new("fetch_records")
                        .with_entity("unit")
                        .with_entity_id(unit),
                )
            })?
            .into_first_result()
            .await
            .map_err(|e| {
                RepositoryError::query_with_context(
                    format!("Failed to read records: {}", e),
                    ErrorContext::new("fetch_records")
                        .with_entity("unit")
                        .with_entity_id(unit),
                )
            })?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<RepositoryResult<Vec<_>>>()
            .map_err(|e| e.with_operation("fetch_records").for_unit(unit))?;

        debug!(
            "Fetched {} records for {} in [{}, {})",
            records.len(),
            unit,
            window.start(),
            window.end()
        );
        Ok(records)
    }
}

#[async_trait]
impl UnitRepository for MssqlRepository {
    async fn list_units(&self) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn("list_units").await?;

        let rows = Query::new(LIST_UNITS_SQL)
            .query(&mut *conn)
            .await
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    format!("Failed to list units: {}", e),
                    ErrorContext::new("list_units"),
                )
            })?
            .into_first_result()
            .await
            .map_err(|e| RepositoryError::query(format!("Failed to read units: {}", e)))?;

        Ok(rows
            .iter()
            .filter_map(|row| row.try_get::<&str, _>(0).ok().flatten().map(str::to_string))
            .collect())
    }
}
