//! Post-hoc anomaly detection over metric vectors and traces.
//!
//! Two independent checks feed one flat report:
//!
//! - **Threshold**: a metric at or below `critical_low` or at or above
//!   `critical_high` (see [`AnomalyConfig`]). Low takes precedence, so a
//!   metric is reported at most once.
//! - **Structural**: every circular dependency found by
//!   [`detect_cycles`](crate::paradox::detect_cycles).
//!
//! Threshold anomalies come first in metric-name order, followed by
//! paradoxes in discovery order. Detection never fails.

use std::collections::BTreeMap;

use chronoweave_types::{Event, EventId, MetricVector};

use crate::config::AnomalyConfig;
use crate::paradox::{detect_cycles, paradox_message};
use crate::simulation::SimulationTrace;

/// A single detected anomaly.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Anomaly {
    /// A metric fell to or below the low threshold.
    CriticalLow {
        /// Metric name.
        metric: String,
        /// Offending value.
        value: f64,
    },
    /// A metric rose to or above the high threshold.
    CriticalHigh {
        /// Metric name.
        metric: String,
        /// Offending value.
        value: f64,
    },
    /// The effect graph contains a cycle closing at this event.
    Paradox {
        /// Event at which the cycle was detected.
        at: EventId,
    },
}

impl core::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CriticalLow { metric, value } => {
                write!(f, "Critical low in {metric}: {}%", format_value(*value))
            }
            Self::CriticalHigh { metric, value } => {
                write!(f, "Critical high in {metric}: {}%", format_value(*value))
            }
            Self::Paradox { at } => f.write_str(&paradox_message(*at)),
        }
    }
}

/// Plain decimal with at least one fractional digit (`5` renders as `5.0`,
/// `4.25` as `4.25`, `0.00005` stays positional).
fn format_value(value: f64) -> String {
    let rendered = format!("{value}");
    if value.is_finite() && !rendered.contains('.') {
        format!("{rendered}.0")
    } else {
        rendered
    }
}

/// Threshold check of a single vector.
pub fn threshold_anomalies(metrics: &MetricVector, thresholds: &AnomalyConfig) -> Vec<Anomaly> {
    metrics
        .iter()
        .filter_map(|(metric, value)| {
            if value <= thresholds.critical_low {
                Some(Anomaly::CriticalLow {
                    metric: metric.to_owned(),
                    value,
                })
            } else if value >= thresholds.critical_high {
                Some(Anomaly::CriticalHigh {
                    metric: metric.to_owned(),
                    value,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Both checks, as typed anomalies.
pub fn scan_anomalies(
    events: &[Event],
    metrics: &MetricVector,
    thresholds: &AnomalyConfig,
) -> Vec<Anomaly> {
    let mut anomalies = threshold_anomalies(metrics, thresholds);
    anomalies.extend(detect_cycles(events).into_iter().map(|at| Anomaly::Paradox { at }));
    anomalies
}

/// Both checks, rendered as messages for the presentation layer.
pub fn detect_anomalies(
    events: &[Event],
    metrics: &MetricVector,
    thresholds: &AnomalyConfig,
) -> Vec<String> {
    scan_anomalies(events, metrics, thresholds)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Threshold check of every year of a simulation trace.
///
/// Years without anomalies are omitted from the result.
pub fn scan_trace(
    trace: &SimulationTrace,
    thresholds: &AnomalyConfig,
) -> BTreeMap<i32, Vec<Anomaly>> {
    trace
        .iter()
        .filter_map(|(year, metrics)| {
            let found = threshold_anomalies(metrics, thresholds);
            (!found.is_empty()).then_some((year, found))
        })
        .collect()
}
