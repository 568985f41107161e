//! Year-by-year timeline simulation.
//!
//! The simulator walks an inclusive year range in ascending order. For each
//! year it folds the events dated that year, in input order, through
//! [`propagate_in`] and records the resulting snapshot. Years without events
//! record an unchanged copy of the previous state, so the trace holds
//! exactly one entry per year. Events outside the range never trigger,
//! although they remain resolvable as effect targets.

use std::collections::BTreeMap;

use chronoweave_types::{Event, MetricVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::decay::validate_half_life;
use crate::error::EngineError;
use crate::graph::EventGraph;
use crate::propagation::propagate_in;

/// Per-year metric snapshots produced by [`simulate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationTrace {
    snapshots: BTreeMap<i32, MetricVector>,
}

impl SimulationTrace {
    /// Create an empty trace.
    pub const fn new() -> Self {
        Self {
            snapshots: BTreeMap::new(),
        }
    }

    /// Record the snapshot for `year`, replacing any previous one.
    pub fn record(&mut self, year: i32, metrics: MetricVector) {
        self.snapshots.insert(year, metrics);
    }

    /// Snapshot at `year`, if simulated.
    pub fn get(&self, year: i32) -> Option<&MetricVector> {
        self.snapshots.get(&year)
    }

    /// Earliest year and its snapshot.
    pub fn first(&self) -> Option<(i32, &MetricVector)> {
        self.snapshots.first_key_value().map(|(year, m)| (*year, m))
    }

    /// Latest year and its snapshot.
    pub fn last(&self) -> Option<(i32, &MetricVector)> {
        self.snapshots.last_key_value().map(|(year, m)| (*year, m))
    }

    /// Number of recorded years.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &MetricVector)> {
        self.snapshots.iter().map(|(year, m)| (*year, m))
    }

    /// The trajectory of one metric. Years where it is absent are skipped.
    pub fn metric_series(&self, metric: &str) -> Vec<(i32, f64)> {
        self.iter()
            .filter_map(|(year, m)| m.get(metric).map(|value| (year, value)))
            .collect()
    }
}

/// Simulate `start_year..=end_year` from `initial`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidParameter`] if `start_year > end_year` or
/// the half-life is not positive.
pub fn simulate(
    initial: &MetricVector,
    events: &[Event],
    start_year: i32,
    end_year: i32,
    half_life_years: f64,
) -> Result<SimulationTrace, EngineError> {
    if start_year > end_year {
        return Err(EngineError::invalid(format!(
            "simulation start year {start_year} is after end year {end_year}"
        )));
    }
    validate_half_life(half_life_years)?;

    let graph = EventGraph::new(events);

    // Group triggering events by year, preserving input order within a year.
    let mut by_year: BTreeMap<i32, Vec<&Event>> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|event| (start_year..=end_year).contains(&event.year))
    {
        by_year.entry(event.year).or_default().push(event);
    }

    let mut trace = SimulationTrace::new();
    let mut current = initial.clone();
    let mut fired: usize = 0;

    for year in start_year..=end_year {
        if let Some(triggers) = by_year.get(&year) {
            for &trigger in triggers {
                current = propagate_in(&current, trigger, &graph, half_life_years)?;
            }
            fired = fired.saturating_add(triggers.len());
            debug!(year, events = triggers.len(), "Simulated year");
        }
        trace.record(year, current.clone());
    }

    info!(
        start_year,
        end_year,
        years = trace.len(),
        events = fired,
        "Simulation complete"
    );

    Ok(trace)
}

/// Advance `metrics` through one year: fire every event dated `year`, in
/// input order.
///
/// Calling this for consecutive years reproduces [`simulate`] one step at a
/// time.
///
/// # Errors
///
/// Returns [`EngineError::InvalidParameter`] if the half-life is not
/// positive.
pub fn simulate_year(
    metrics: &MetricVector,
    events: &[Event],
    year: i32,
    half_life_years: f64,
) -> Result<MetricVector, EngineError> {
    validate_half_life(half_life_years)?;
    let graph = EventGraph::new(events);
    let mut current = metrics.clone();
    for trigger in events.iter().filter(|event| event.year == year) {
        current = propagate_in(&current, trigger, &graph, half_life_years)?;
    }
    Ok(current)
}
