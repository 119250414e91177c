//! Per-model aggregation over a single time window.
//!
//! Records are grouped by `(model, recorded target rate)`. A model whose
//! target changed inside the window therefore yields one summary per target,
//! which is how the production view has always reported it.

use std::collections::HashMap;

use tracing::debug;

use crate::models::record::defined_target;
use crate::models::summary::quality_ratio;
use crate::models::{ModelSummary, RawRecord, Ratio, TimeWindow, SECONDS_PER_HOUR};

/// Hashable stand-in for an optional `f64` target rate.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
struct FloatKey(u64);

impl FloatKey {
    fn new(value: f64) -> Self {
        Self(value.to_bits())
    }
}

#[derive(Clone, Hash, PartialEq, Eq)]
struct GroupKey {
    model: String,
    target: Option<FloatKey>,
}

struct Tally {
    target_rate: Option<f64>,
    success: u64,
    fail: u64,
}

/// Summarise `records` per `(model, target)` over `window`.
///
/// Records must already be restricted to the window. Results are sorted by
/// model, then by target, with missing targets first.
pub fn aggregate(records: &[RawRecord], window: &TimeWindow) -> Vec<ModelSummary> {
    summarize_models(records, window.duration_seconds())
}

/// Same as [`aggregate`] with an explicit operation time in seconds.
///
/// A non-positive operation time yields zero performance for models with a
/// target, never a missing one.
pub fn summarize_models(records: &[RawRecord], operation_seconds: f64) -> Vec<ModelSummary> {
    let mut groups: HashMap<GroupKey, Tally> = HashMap::new();

    for record in records {
        let key = GroupKey {
            model: record.model.clone(),
            target: record.target_rate.map(FloatKey::new),
        };
        let tally = groups.entry(key).or_insert_with(|| Tally {
            target_rate: record.target_rate,
            success: 0,
            fail: 0,
        });
        if record.passed {
            tally.success += 1;
        } else {
            tally.fail += 1;
        }
    }

    let mut summaries: Vec<(Option<f64>, ModelSummary)> = groups
        .into_iter()
        .map(|(key, tally)| {
            let summary = summarize_group(key.model, &tally, operation_seconds);
            (tally.target_rate, summary)
        })
        .collect();

    summaries.sort_by(|(a_rate, a), (b_rate, b)| {
        a.model.cmp(&b.model).then_with(|| match (a_rate, b_rate) {
            (Some(x), Some(y)) => x.total_cmp(y),
            (x, y) => x.is_some().cmp(&y.is_some()),
        })
    });

    debug!(
        "Aggregated {} records into {} model groups",
        records.len(),
        summaries.len()
    );

    summaries.into_iter().map(|(_, summary)| summary).collect()
}

fn summarize_group(model: String, tally: &Tally, operation_seconds: f64) -> ModelSummary {
    let total = tally.success + tally.fail;
    let quality = quality_ratio(tally.success, total);
    let target = defined_target(tally.target_rate);

    let performance = match target {
        Some(rate) => {
            let ideal_cycle_seconds = SECONDS_PER_HOUR / rate;
            Ratio::of(total as f64 * ideal_cycle_seconds, operation_seconds)
        }
        None => Ratio::NotApplicable,
    };

    ModelSummary {
        model,
        success_count: tally.success,
        fail_count: tally.fail,
        total_count: total,
        target,
        quality,
        performance,
        oee: performance.scale(quality),
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod aggregator_tests;
