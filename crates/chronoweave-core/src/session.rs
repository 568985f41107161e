//! State of one interactive exploration of the timeline.
//!
//! A session owns the branch registry, tracks which branch is active, and
//! keeps a running metric vector that advances as the user moves through
//! years. Everything it derives (paradoxes, anomalies, filtered views,
//! connections) is computed from the active branch on request.

use chronoweave_types::{BranchId, Connection, Event, EventId, MetricVector, TimelineBranch};
use tracing::{info, warn};

use crate::anomaly::detect_anomalies;
use crate::branch::{BranchRegistry, generate_branch_id};
use crate::config::ChronoweaveConfig;
use crate::connections::event_connections;
use crate::error::EngineError;
use crate::filter::{EventFilter, filter};
use crate::paradox::detect_paradoxes;
use crate::simulation::{SimulationTrace, simulate, simulate_year};

/// Interactive session over a branching timeline.
#[derive(Debug, Clone)]
pub struct TimelineSession {
    config: ChronoweaveConfig,
    registry: BranchRegistry,
    active: BranchId,
    current_year: i32,
    metrics: MetricVector,
    filter: EventFilter,
}

impl TimelineSession {
    /// Start a session on `main` holding `events`, at the configured base
    /// year with every tracked metric at its baseline.
    pub fn new(events: Vec<Event>, config: ChronoweaveConfig) -> Self {
        let metrics = config.metrics.initial_vector();
        Self {
            current_year: config.timeline.base_year,
            registry: BranchRegistry::new(events),
            active: BranchId::main(),
            metrics,
            filter: EventFilter::default(),
            config,
        }
    }

    /// The configuration this session runs with.
    pub const fn config(&self) -> &ChronoweaveConfig {
        &self.config
    }

    /// All branches.
    pub const fn branches(&self) -> &BranchRegistry {
        &self.registry
    }

    /// Id of the active branch.
    pub const fn active_branch_id(&self) -> &BranchId {
        &self.active
    }

    /// The active branch.
    pub fn active_branch(&self) -> Option<&TimelineBranch> {
        self.registry.get(&self.active)
    }

    /// Events of the active branch.
    pub fn events(&self) -> &[Event] {
        self.active_branch()
            .map(|branch| branch.events.as_slice())
            .unwrap_or_default()
    }

    /// Year the session is positioned at.
    pub const fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Running metric vector.
    pub const fn metrics(&self) -> &MetricVector {
        &self.metrics
    }

    /// Move to `year`, firing every active-branch event dated that year onto
    /// the running metrics.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if the configured half-life
    /// is not positive.
    pub fn set_current_year(&mut self, year: i32) -> Result<&MetricVector, EngineError> {
        let next = simulate_year(
            &self.metrics,
            self.events(),
            year,
            self.config.timeline.decay_half_life_years,
        )?;
        self.current_year = year;
        self.metrics = next;
        Ok(&self.metrics)
    }

    /// Fork the active branch under a generated id and switch to it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownBranch`] if the active branch has
    /// vanished, or [`EngineError::DuplicateBranch`] on an id collision.
    pub fn create_branch(&mut self) -> Result<BranchId, EngineError> {
        let id = generate_branch_id();
        self.registry.fork_from(&self.active, id.clone())?;
        self.switch_branch(&id)?;
        Ok(id)
    }

    /// Make `id` the active branch.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownBranch`] if `id` is not registered.
    pub fn switch_branch(&mut self, id: &BranchId) -> Result<(), EngineError> {
        if !self.registry.contains(id) {
            return Err(EngineError::UnknownBranch(id.clone()));
        }
        info!(from = %self.active, to = %id, "Switched branch");
        self.active = id.clone();
        Ok(())
    }

    /// Circular dependencies in the active branch.
    pub fn paradoxes(&self) -> Vec<String> {
        let found = detect_paradoxes(self.events());
        if !found.is_empty() {
            warn!(branch = %self.active, count = found.len(), "Paradoxes detected");
        }
        found
    }

    /// Anomalies of the running metrics and the active branch.
    pub fn anomalies(&self) -> Vec<String> {
        detect_anomalies(self.events(), &self.metrics, &self.config.anomaly)
    }

    /// Replace the view filter.
    pub fn set_filter(&mut self, filter: EventFilter) {
        self.filter = filter;
    }

    /// The view filter.
    pub const fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Select `category`, or clear the category filter if it is already
    /// selected.
    pub fn toggle_category(&mut self, category: &str) {
        self.filter.category = match self.filter.category.take() {
            Some(current) if current == category => None,
            _ => Some(category.to_owned()),
        };
    }

    /// Select `metric`, or clear the impact filter if it is already
    /// selected.
    pub fn toggle_impact_type(&mut self, metric: &str) {
        self.filter.impact_type = match self.filter.impact_type.take() {
            Some(current) if current == metric => None,
            _ => Some(metric.to_owned()),
        };
    }

    /// Active-branch events passing the view filter.
    pub fn filtered_events(&self) -> Vec<Event> {
        filter(self.events(), &self.filter)
    }

    /// Direct connections of one active-branch event, for highlighting.
    pub fn connections_for(&self, id: EventId) -> Vec<Connection> {
        let events = self.events();
        events
            .iter()
            .find(|event| event.id == id)
            .map(|event| event_connections(event, events))
            .unwrap_or_default()
    }

    /// Simulate the active branch over the configured span, starting from
    /// baseline metrics at the base year.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if the configured half-life
    /// is not positive.
    pub fn simulate_range(&self) -> Result<SimulationTrace, EngineError> {
        let timeline = &self.config.timeline;
        simulate(
            &self.config.metrics.initial_vector(),
            self.events(),
            timeline.base_year,
            timeline.end_year(),
            timeline.decay_half_life_years,
        )
    }
}
