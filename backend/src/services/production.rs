//! Flat and hourly OEE queries for a unit.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregator::aggregate;
use super::error::OeeError;
use super::hourly::bucketize;
use crate::db::repository::RecordRepository;
use crate::models::{ModelSummary, RangeSummary, TimeWindow};

/// How a query's result is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// One summary per model over the whole range.
    Flat,
    /// Hour-aligned buckets rolled into range totals.
    Hourly,
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "hourly" => Ok(Self::Hourly),
            _ => Err(format!("Unknown query mode: {}", s)),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Flat => f.write_str("flat"),
            QueryMode::Hourly => f.write_str("hourly"),
        }
    }
}

/// Result of a query in either mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OeeReport {
    Flat(Vec<ModelSummary>),
    Hourly(RangeSummary),
}

/// Per-model summaries for `unit` over `[start, end)`.
pub async fn production_summary<R>(
    repo: &R,
    unit: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<ModelSummary>, OeeError>
where
    R: RecordRepository + ?Sized,
{
    let window = TimeWindow::new(start, end)?;
    let records = repo.fetch_records(unit, &window).await?;
    debug!("Flat query for {} matched {} records", unit, records.len());
    Ok(aggregate(&records, &window))
}

/// Run a query in the requested mode.
pub async fn run_query<R>(
    repo: &R,
    unit: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    mode: QueryMode,
    concurrency: usize,
) -> Result<OeeReport, OeeError>
where
    R: RecordRepository + ?Sized,
{
    match mode {
        QueryMode::Flat => production_summary(repo, unit, start, end)
            .await
            .map(OeeReport::Flat),
        QueryMode::Hourly => bucketize(repo, unit, start, end, concurrency)
            .await
            .map(OeeReport::Hourly),
    }
}
