//! Civilization metric vectors.
//!
//! A [`MetricVector`] maps metric names to values bounded by
//! [`METRIC_MIN`]..=[`METRIC_MAX`]. The set of metrics is open: events may
//! introduce new names at runtime, so the vector is an ordered map rather
//! than a fixed struct. Ordering by name keeps every derived report
//! reproducible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lower bound of every metric value.
pub const METRIC_MIN: f64 = 0.0;

/// Upper bound of every metric value.
pub const METRIC_MAX: f64 = 200.0;

/// Starting value of every known metric.
pub const METRIC_BASELINE: f64 = 100.0;

/// Metrics tracked by default.
pub const CORE_METRICS: [&str; 5] = ["economy", "society", "technology", "education", "health"];

/// Clamp a raw metric value into `[METRIC_MIN, METRIC_MAX]`.
///
/// `NaN` collapses to [`METRIC_MIN`] so the bound holds for every input.
pub fn clamp_metric(value: f64) -> f64 {
    if value.is_nan() {
        METRIC_MIN
    } else {
        value.clamp(METRIC_MIN, METRIC_MAX)
    }
}

/// The state of all tracked civilization metrics at one point in time.
///
/// Every stored value is clamped. Vectors are treated as values: the engine
/// derives new vectors instead of mutating the ones it is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MetricVector(BTreeMap<String, f64>);

impl MetricVector {
    /// Create an empty vector.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Create a vector holding `value` for every name in `names`.
    pub fn baseline<I, S>(names: I, value: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vector = Self::new();
        for name in names {
            vector.set(name, value);
        }
        vector
    }

    /// The five core metrics at [`METRIC_BASELINE`].
    pub fn core_baseline() -> Self {
        Self::baseline(CORE_METRICS, METRIC_BASELINE)
    }

    /// Value of `metric`, if tracked.
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.0.get(metric).copied()
    }

    /// Value of `metric`, or `0.0` when it is not tracked yet.
    pub fn value_or_zero(&self, metric: &str) -> f64 {
        self.get(metric).unwrap_or(0.0)
    }

    /// Store `value` (clamped) under `metric`, inserting it if absent.
    pub fn set(&mut self, metric: impl Into<String>, value: f64) {
        self.0.insert(metric.into(), clamp_metric(value));
    }

    /// Whether `metric` is tracked.
    pub fn contains(&self, metric: &str) -> bool {
        self.0.contains_key(metric)
    }

    /// Number of tracked metrics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no metric is tracked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(metric, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Iterate over tracked metric names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for MetricVector {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut vector = Self::new();
        for (name, value) in iter {
            vector.set(name, value);
        }
        vector
    }
}

impl<const N: usize> From<[(&str, f64); N]> for MetricVector {
    fn from(pairs: [(&str, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}
