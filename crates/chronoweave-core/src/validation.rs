//! Structural validation of an event set.
//!
//! Validation reports problems without failing or fixing anything. The
//! engine tolerates every issue listed here (dangling ids are skipped,
//! duplicates resolve to the first occurrence), so callers decide whether
//! an issue is fatal for them.
//!
//! Issues are reported in a stable order: the event-count cap first, then
//! per event in input order.

use std::collections::BTreeSet;

use chronoweave_types::{EdgeKind, Event, EventId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ValidationConstraints;
use crate::graph::EventGraph;

/// A single problem found in an event set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationIssue {
    /// An `effects` or `caused_by` entry names no event in the set.
    UnknownReference {
        /// Event holding the reference.
        event: EventId,
        /// The dangling id.
        reference: EventId,
        /// Which edge list the reference is in.
        edge: EdgeKind,
    },
    /// An id occurs more than once; only the first occurrence is reachable.
    DuplicateId {
        /// The repeated id.
        id: EventId,
    },
    /// A BCE year where negative years are disallowed.
    NegativeYear {
        /// Offending event.
        event: EventId,
        /// Its year.
        year: i32,
    },
    /// A delta larger in magnitude than the full metric range.
    ImpactOutOfRange {
        /// Offending event.
        event: EventId,
        /// Metric name.
        metric: String,
        /// The delta.
        delta: f64,
    },
    /// A strength outside `[0, 1]`.
    StrengthOutOfRange {
        /// Offending event.
        event: EventId,
        /// The strength.
        strength: f64,
    },
    /// The set exceeds the configured cap.
    TooManyEvents {
        /// Number of events supplied.
        count: usize,
        /// Configured maximum.
        max: usize,
    },
}

impl core::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownReference {
                event,
                reference,
                edge,
            } => write!(f, "event {event} {edge} unknown event {reference}"),
            Self::DuplicateId { id } => write!(f, "duplicate event id {id}"),
            Self::NegativeYear { event, year } => {
                write!(f, "event {event} has negative year {year}")
            }
            Self::ImpactOutOfRange {
                event,
                metric,
                delta,
            } => write!(f, "event {event} impact on {metric} is out of range: {delta}"),
            Self::StrengthOutOfRange { event, strength } => {
                write!(f, "event {event} strength {strength} is outside [0, 1]")
            }
            Self::TooManyEvents { count, max } => {
                write!(f, "{count} events exceed the maximum of {max}")
            }
        }
    }
}

/// Check `events` against `constraints`. Never fails.
pub fn validate_events(events: &[Event], constraints: &ValidationConstraints) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(max) = constraints.max_events
        && events.len() > max
    {
        issues.push(ValidationIssue::TooManyEvents {
            count: events.len(),
            max,
        });
    }

    let graph = EventGraph::new(events);
    let span = constraints.max_impact_value - constraints.min_impact_value;
    let mut seen: BTreeSet<EventId> = BTreeSet::new();

    for event in events {
        if !seen.insert(event.id) && constraints.unique_ids {
            issues.push(ValidationIssue::DuplicateId { id: event.id });
        }

        if !constraints.allow_negative_years && event.year < 0 {
            issues.push(ValidationIssue::NegativeYear {
                event: event.id,
                year: event.year,
            });
        }

        if !(event.strength.is_finite() && (0.0..=1.0).contains(&event.strength)) {
            issues.push(ValidationIssue::StrengthOutOfRange {
                event: event.id,
                strength: event.strength,
            });
        }

        for (metric, delta) in &event.impact {
            if !delta.is_finite() || delta.abs() > span {
                issues.push(ValidationIssue::ImpactOutOfRange {
                    event: event.id,
                    metric: metric.clone(),
                    delta: *delta,
                });
            }
        }

        let edges = event
            .effects
            .iter()
            .map(|id| (*id, EdgeKind::Effects))
            .chain(event.caused_by.iter().map(|id| (*id, EdgeKind::CausedBy)));
        for (reference, edge) in edges {
            if !graph.contains(reference) {
                issues.push(ValidationIssue::UnknownReference {
                    event: event.id,
                    reference,
                    edge,
                });
            }
        }
    }

    debug!(events = events.len(), issues = issues.len(), "Validated event set");
    issues
}
