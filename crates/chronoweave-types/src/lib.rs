//! Shared type definitions for the Chronoweave timeline engine.
//!
//! This crate is the single source of truth for the data model exchanged
//! between the engine and its presentation layer. Types defined here flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier wrappers for events and branches
//! - [`enums`] -- Connection kinds, directions and edge kinds
//! - [`metrics`] -- The bounded, open-ended [`MetricVector`]
//! - [`structs`] -- Events, branches, connections and display catalogs

pub mod enums;
pub mod ids;
pub mod metrics;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ConnectionDirection, ConnectionType, EdgeKind};
pub use ids::{BranchId, EventId, MAIN_BRANCH};
pub use metrics::{
    CORE_METRICS, METRIC_BASELINE, METRIC_MAX, METRIC_MIN, MetricVector, clamp_metric,
};
pub use structs::{
    Category, Connection, DEFAULT_DURATION_YEARS, DEFAULT_STRENGTH, Event, ImpactType,
    TimelineBranch,
};
