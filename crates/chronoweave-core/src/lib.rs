//! Timeline engine for Chronoweave.
//!
//! Computes how historical events ripple forward onto a vector of
//! civilization metrics, detects circular causality and out-of-bounds
//! metrics, and manages forked counterfactual branches. The engine is
//! synchronous and performs no I/O; configuration is loaded by callers and
//! passed in as parameters.
//!
//! # Modules
//!
//! - [`anomaly`] -- Threshold and structural anomaly detection over metric
//!   vectors and simulation traces.
//! - [`branch`] -- [`BranchRegistry`] with copy-on-fork branches.
//! - [`config`] -- YAML configuration with env overrides.
//! - [`connections`] -- Display connections derived from event edges.
//! - [`decay`] -- Exponential half-life decay.
//! - [`error`] -- [`EngineError`].
//! - [`filter`] -- Conjunctive [`EventFilter`] over event sets.
//! - [`graph`] -- Id-indexed read-only view of an event slice.
//! - [`paradox`] -- Cycle detection over `effects` edges.
//! - [`propagation`] -- Direct impact plus decay-weighted forward effects.
//! - [`session`] -- [`TimelineSession`] state for one interactive user.
//! - [`simulation`] -- Year-by-year simulation producing a [`SimulationTrace`].
//! - [`starting_timeline`] -- Seed events and display catalogs.
//! - [`validation`] -- Non-failing structural checks of an event set.

pub mod anomaly;
pub mod branch;
pub mod config;
pub mod connections;
pub mod decay;
pub mod error;
pub mod filter;
pub mod graph;
pub mod paradox;
pub mod propagation;
pub mod session;
pub mod simulation;
pub mod starting_timeline;
pub mod validation;

// Re-export primary types at crate root.
pub use anomaly::{Anomaly, detect_anomalies, scan_anomalies, scan_trace, threshold_anomalies};
pub use branch::{BranchRegistry, generate_branch_id};
pub use config::{
    AnomalyConfig, ChronoweaveConfig, ConfigError, LoggingConfig, MetricsConfig, TimelineConfig,
    ValidationConstraints,
};
pub use connections::{event_connections, indirect_connections};
pub use decay::decay;
pub use error::EngineError;
pub use filter::{EventFilter, YearRange, filter};
pub use graph::EventGraph;
pub use paradox::{detect_cycles, detect_paradoxes};
pub use propagation::{propagate, propagate_in};
pub use session::TimelineSession;
pub use simulation::{SimulationTrace, simulate, simulate_year};
pub use starting_timeline::{default_categories, default_impact_types, starting_events};
pub use validation::{ValidationIssue, validate_events};
