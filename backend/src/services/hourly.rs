//! Hour-aligned bucketing of a time range.
//!
//! A range is cut into buckets that start on the hour (the first one at the
//! range start truncated to its hour) and end an hour later or at the range
//! end, whichever comes first. Each bucket is aggregated per model, collapsed
//! into a [`BucketSummary`], and the buckets are rolled into a
//! [`RangeSummary`].
//!
//! Performance is rolled up in two stages. Within a bucket it is the total
//! theoretical time of every model with a target over the bucket's length.
//! Across the range it is the plain mean of the bucket performances that
//! exist, so a quiet hour weighs as much as a busy one.

use chrono::{Duration, NaiveDateTime};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use super::aggregator::aggregate;
use super::error::OeeError;
use crate::db::repository::RecordRepository;
use crate::models::summary::quality_ratio;
use crate::models::{
    truncate_to_hour, BucketSummary, ModelSummary, RangeSummary, Ratio, TimeWindow,
};

/// Partition `range` into hour-aligned buckets, in chronological order.
pub fn hour_buckets(range: &TimeWindow) -> Vec<TimeWindow> {
    let mut buckets = Vec::new();
    let mut start = truncate_to_hour(range.start());

    while start < range.end() {
        // Past the last representable hour the bucket is clipped to the range end.
        let next = start
            .checked_add_signed(Duration::hours(1))
            .map_or(range.end(), |next| next.min(range.end()));
        buckets.push(TimeWindow::from_ordered(start, next));
        start = next;
    }

    buckets
}

/// Collapse the per-model summaries of one bucket.
pub fn summarize_bucket(window: &TimeWindow, models: &[ModelSummary]) -> BucketSummary {
    let success_count: u64 = models.iter().map(|m| m.success_count).sum();
    let fail_count: u64 = models.iter().map(|m| m.fail_count).sum();
    let total_count: u64 = models.iter().map(|m| m.total_count).sum();
    let quality = quality_ratio(success_count, total_count);

    let theoretical: Vec<f64> = models
        .iter()
        .filter_map(ModelSummary::theoretical_seconds)
        .collect();

    let performance = if theoretical.is_empty() {
        Ratio::NotApplicable
    } else {
        Ratio::of(theoretical.iter().sum(), window.duration_seconds())
    };

    BucketSummary {
        bucket_start: window.start(),
        bucket_end: window.end(),
        success_count,
        fail_count,
        total_count,
        quality,
        performance,
        oee: performance.scale(quality),
    }
}

/// Roll bucket summaries into range totals. Buckets must be chronological.
pub fn roll_up(unit: &str, buckets: Vec<BucketSummary>) -> RangeSummary {
    let total_success_count: u64 = buckets.iter().map(|b| b.success_count).sum();
    let total_fail_count: u64 = buckets.iter().map(|b| b.fail_count).sum();
    let total_count: u64 = buckets.iter().map(|b| b.total_count).sum();
    let total_quality = quality_ratio(total_success_count, total_count);

    let performances: Vec<f64> = buckets
        .iter()
        .filter_map(|b| b.performance.value())
        .collect();

    let average_performance = if performances.is_empty() {
        Ratio::NotApplicable
    } else {
        Ratio::Value(performances.iter().sum::<f64>() / performances.len() as f64)
    };

    RangeSummary {
        unit: unit.to_string(),
        total_success_count,
        total_fail_count,
        total_count,
        total_quality,
        average_performance,
        total_oee: average_performance.scale(total_quality),
        buckets,
    }
}

/// Fetch, aggregate and roll up `[start, end)` for `unit` hour by hour.
///
/// Up to `concurrency` bucket fetches run at once; results are assembled in
/// bucket order. The first failed fetch aborts the whole range.
pub async fn bucketize<R>(
    repo: &R,
    unit: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    concurrency: usize,
) -> Result<RangeSummary, OeeError>
where
    R: RecordRepository + ?Sized,
{
    let range = TimeWindow::new(start, end)?;
    let windows = hour_buckets(&range);
    debug!(
        "Bucketizing {} over [{}, {}) into {} buckets",
        unit,
        start,
        end,
        windows.len()
    );

    let buckets: Vec<BucketSummary> = stream::iter(windows)
        .map(|window| async move {
            let records = repo.fetch_records(unit, &window).await?;
            let models = aggregate(&records, &window);
            let bucket = summarize_bucket(&window, &models);
            debug!(
                "Bucket [{}, {}) for {}: {} records, performance {:?}",
                bucket.bucket_start, bucket.bucket_end, unit, bucket.total_count, bucket.performance
            );
            Ok::<_, OeeError>(bucket)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(roll_up(unit, buckets))
}

#[cfg(test)]
#[path = "hourly_tests.rs"]
mod hourly_tests;
