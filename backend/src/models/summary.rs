//! Aggregated OEE summaries.
//!
//! Quality is always a number. Performance and OEE are [`Ratio`]s, which keep
//! "no target defined" apart from "target defined but no operation time":
//! the first is not applicable, the second is zero.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::time::TimeWindow;

/// An optional ratio with an explicit reason for absence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ratio {
    /// Not computable (no target rate).
    #[default]
    NotApplicable,
    /// Computable, but the denominator was not positive.
    Zero,
    Value(f64),
}

impl Ratio {
    /// `numerator / denominator`, or [`Ratio::Zero`] when the denominator is not positive.
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator > 0.0 {
            Ratio::Value(numerator / denominator)
        } else {
            Ratio::Zero
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::NotApplicable => None,
            Ratio::Zero => Some(0.0),
            Ratio::Value(v) => Some(v),
        }
    }

    pub fn is_applicable(self) -> bool {
        !matches!(self, Ratio::NotApplicable)
    }

    /// Multiply by `factor`, preserving the absence reason.
    pub fn scale(self, factor: f64) -> Self {
        match self {
            Ratio::Value(v) => Ratio::Value(v * factor),
            other => other,
        }
    }
}

impl From<Option<f64>> for Ratio {
    fn from(value: Option<f64>) -> Self {
        match value {
            None => Ratio::NotApplicable,
            Some(v) if v == 0.0 => Ratio::Zero,
            Some(v) => Ratio::Value(v),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<f64>::deserialize(deserializer).map(Ratio::from)
    }
}

/// `success / total`, or `0` for an empty tally.
pub fn quality_ratio(success: u64, total: u64) -> f64 {
    if total > 0 {
        success as f64 / total as f64
    } else {
        0.0
    }
}

/// Per-model aggregate over one window.
///
/// `performance` and `oee` are applicable exactly when `target` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model: String,
    #[serde(rename = "success_qty")]
    pub success_count: u64,
    #[serde(rename = "fail_qty")]
    pub fail_count: u64,
    #[serde(rename = "total_qty")]
    pub total_count: u64,
    pub target: Option<f64>,
    pub quality: f64,
    pub performance: Ratio,
    pub oee: Ratio,
}

impl ModelSummary {
    /// Seconds the produced quantity would take at the target rate.
    pub fn theoretical_seconds(&self) -> Option<f64> {
        self.target
            .map(|rate| self.total_count as f64 * super::time::SECONDS_PER_HOUR / rate)
    }
}

/// Aggregate over one hour-aligned bucket, across all models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    #[serde(rename = "hour_start")]
    pub bucket_start: NaiveDateTime,
    /// Clipped to the range end for a partial final bucket.
    #[serde(rename = "hour_end")]
    pub bucket_end: NaiveDateTime,
    #[serde(rename = "success_qty")]
    pub success_count: u64,
    #[serde(rename = "fail_qty")]
    pub fail_count: u64,
    #[serde(rename = "total_qty")]
    pub total_count: u64,
    pub quality: f64,
    pub performance: Ratio,
    pub oee: Ratio,
}

impl BucketSummary {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_ordered(self.bucket_start, self.bucket_end)
    }
}

/// Roll-up of all buckets in a requested range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    #[serde(rename = "unit_name")]
    pub unit: String,
    #[serde(rename = "total_success")]
    pub total_success_count: u64,
    #[serde(rename = "total_fail")]
    pub total_fail_count: u64,
    #[serde(rename = "total_qty")]
    pub total_count: u64,
    pub total_quality: f64,
    /// Unweighted mean of the applicable bucket performances.
    pub average_performance: Ratio,
    pub total_oee: Ratio,
    /// Chronological.
    #[serde(rename = "hourly_data")]
    pub buckets: Vec<BucketSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_of_zero_denominator() {
        assert_eq!(Ratio::of(10.0, 0.0), Ratio::Zero);
        assert_eq!(Ratio::of(10.0, -5.0), Ratio::Zero);
        assert_eq!(Ratio::of(3.0, 4.0), Ratio::Value(0.75));
    }

    #[test]
    fn test_ratio_scale_preserves_absence() {
        assert_eq!(Ratio::NotApplicable.scale(0.5), Ratio::NotApplicable);
        assert_eq!(Ratio::Zero.scale(0.5), Ratio::Zero);
        assert_eq!(Ratio::Value(0.8).scale(0.5), Ratio::Value(0.4));
    }

    #[test]
    fn test_ratio_serialization() {
        assert_eq!(serde_json::to_string(&Ratio::NotApplicable).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Ratio::Zero).unwrap(), "0.0");
        assert_eq!(serde_json::to_string(&Ratio::Value(0.9)).unwrap(), "0.9");
    }

    #[test]
    fn test_ratio_deserialization() {
        let parsed: Vec<Ratio> = serde_json::from_str("[null, 0.0, 0.25]").unwrap();
        assert_eq!(parsed, vec![Ratio::NotApplicable, Ratio::Zero, Ratio::Value(0.25)]);
    }

    #[test]
    fn test_quality_ratio() {
        assert_eq!(quality_ratio(0, 0), 0.0);
        assert_eq!(quality_ratio(80, 100), 0.8);
    }

    #[test]
    fn test_model_summary_wire_names() {
        let summary = ModelSummary {
            model: "A".to_string(),
            success_count: 8,
            fail_count: 2,
            total_count: 10,
            target: None,
            quality: 0.8,
            performance: Ratio::NotApplicable,
            oee: Ratio::NotApplicable,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["success_qty"], 8);
        assert_eq!(json["fail_qty"], 2);
        assert_eq!(json["total_qty"], 10);
        assert!(json["target"].is_null());
        assert!(json["performance"].is_null());
        assert!(json["oee"].is_null());
    }
}
