//! Raw production records as read from the data store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One observed production event (a unit under test passing or failing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Model identifier.
    pub model: String,
    /// Test outcome: `true` for pass.
    pub passed: bool,
    /// Designed units per hour for this model as recorded; `None` or `0` means
    /// no target is defined.
    #[serde(default)]
    pub target_rate: Option<f64>,
}

impl RawRecord {
    pub fn new(model: impl Into<String>, passed: bool, target_rate: Option<f64>) -> Self {
        Self {
            model: model.into(),
            passed,
            target_rate,
        }
    }

    pub fn pass(model: impl Into<String>, target_rate: Option<f64>) -> Self {
        Self::new(model, true, target_rate)
    }

    pub fn fail(model: impl Into<String>, target_rate: Option<f64>) -> Self {
        Self::new(model, false, target_rate)
    }

    /// The target rate when one is defined (finite and positive).
    pub fn target(&self) -> Option<f64> {
        defined_target(self.target_rate)
    }
}

/// Normalise a recorded target rate: only finite positive rates count.
pub fn defined_target(rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| r.is_finite() && *r > 0.0)
}

/// A record together with the unit and time it was logged at.
///
/// This is the shape the in-memory repository keeps and the shape of its
/// JSON seed files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub unit: String,
    pub recorded_at: NaiveDateTime,
    #[serde(flatten)]
    pub record: RawRecord,
}

impl StoredRecord {
    pub fn new(unit: impl Into<String>, recorded_at: NaiveDateTime, record: RawRecord) -> Self {
        Self {
            unit: unit.into(),
            recorded_at,
            record,
        }
    }
}
