//! Core records: events, branches, connections and the display catalogs.
//!
//! Field names serialize in camelCase so JSON timelines authored for the
//! presentation layer (`causedBy`, `branchId`, `isParadox`, the title stored
//! under `event`) load without translation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ConnectionDirection, ConnectionType};
use crate::ids::{BranchId, EventId};
use crate::metrics::{METRIC_MAX, METRIC_MIN};

/// Influence strength applied when an event does not declare one.
pub const DEFAULT_STRENGTH: f64 = 0.5;

/// Impact duration in years applied when an event does not declare one.
pub const DEFAULT_DURATION_YEARS: u32 = 10;

const fn default_strength() -> f64 {
    DEFAULT_STRENGTH
}

const fn default_duration() -> u32 {
    DEFAULT_DURATION_YEARS
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An atomic historical occurrence and its outgoing/incoming causal edges.
///
/// Edges are stored as [`EventId`] lists, never as references, so the effect
/// graph may contain cycles. Events are immutable by convention once loaded;
/// the only field the engine rewrites is [`Event::branch_id`], stamped when a
/// branch is forked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique, stable identifier.
    pub id: EventId,
    /// Year of occurrence. Negative for BCE.
    pub year: i32,
    /// Short title.
    #[serde(rename = "event", default)]
    pub title: String,
    /// Longer free-form description.
    #[serde(default)]
    pub description: String,
    /// Category identifier (see [`Category`]).
    #[serde(default)]
    pub category: String,
    /// Metric deltas applied when the event fires.
    #[serde(default)]
    pub impact: BTreeMap<String, f64>,
    /// Events this event influences, in declaration order.
    #[serde(default)]
    pub effects: Vec<EventId>,
    /// Events that caused this one. Informational; propagation ignores it.
    #[serde(default)]
    pub caused_by: Vec<EventId>,
    /// Influence strength in `[0, 1]`, scaling downstream contributions.
    #[serde(default = "default_strength")]
    pub strength: f64,
    /// Duration of the impact in years. Carried onto derived connections.
    #[serde(default = "default_duration")]
    pub duration: u32,
    /// Free-form keywords used by the filter layer.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Branch this copy of the event belongs to.
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    /// Author-supplied paradox marker. Detection never reads it.
    #[serde(default)]
    pub is_paradox: bool,
    /// Arbitrary extra data carried through untouched.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Event {
    /// Create an event with no impact, no edges and default strength.
    pub fn new(id: u32, year: i32, category: impl Into<String>) -> Self {
        Self {
            id: EventId(id),
            year,
            title: String::new(),
            description: String::new(),
            category: category.into(),
            impact: BTreeMap::new(),
            effects: Vec::new(),
            caused_by: Vec::new(),
            strength: DEFAULT_STRENGTH,
            duration: DEFAULT_DURATION_YEARS,
            tags: BTreeSet::new(),
            branch_id: None,
            is_paradox: false,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the title and description.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.title = title.into();
        self.description = description.into();
        self
    }

    /// Add one metric delta to the impact map.
    #[must_use]
    pub fn with_impact(mut self, metric: impl Into<String>, delta: f64) -> Self {
        self.impact.insert(metric.into(), delta);
        self
    }

    /// Replace the forward edge list.
    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = u32>) -> Self {
        self.effects = effects.into_iter().map(EventId).collect();
        self
    }

    /// Replace the back edge list.
    #[must_use]
    pub fn with_caused_by(mut self, causes: impl IntoIterator<Item = u32>) -> Self {
        self.caused_by = causes.into_iter().map(EventId).collect();
        self
    }

    /// Set the influence strength.
    #[must_use]
    pub const fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Add tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Stamp the branch tag.
    #[must_use]
    pub fn in_branch(mut self, branch: BranchId) -> Self {
        self.branch_id = Some(branch);
        self
    }

    /// Whether the impact map names `metric`, regardless of its value.
    pub fn affects_metric(&self, metric: &str) -> bool {
        self.impact.contains_key(metric)
    }

    /// Whether every tag in `tags` is present on this event.
    pub fn has_all_tags<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter().all(|tag| self.tags.contains(tag))
    }
}

// ---------------------------------------------------------------------------
// Timeline Branch
// ---------------------------------------------------------------------------

/// An independent, value-owned copy of an event set.
///
/// Branches never share storage: forking clones every event, so edits to one
/// branch cannot be observed from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TimelineBranch {
    /// Unique branch identifier.
    pub id: BranchId,
    /// Optional human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Events owned by this branch, each tagged with [`TimelineBranch::id`].
    pub events: Vec<Event>,
    /// Branch this one was forked from. `None` for `main`.
    #[serde(default)]
    pub parent_branch: Option<BranchId>,
    /// When the branch was created.
    pub created_at: DateTime<Utc>,
}

impl TimelineBranch {
    /// Display label: the name if set, `Main Timeline` for `main`, else the id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None if self.id.is_main() => String::from("Main Timeline"),
            None => self.id.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// A derived edge between two years, produced for display.
///
/// Connections carry no lifecycle of their own; they are recomputed from the
/// event set whenever the presentation layer asks for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Connection {
    /// Starting year.
    pub from: i32,
    /// Ending year.
    pub to: i32,
    /// Kind of relationship.
    #[serde(rename = "type")]
    pub kind: ConnectionType,
    /// Connection strength in `[0, 1]`.
    pub strength: f64,
    /// Duration of influence in years, when known.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Temporal direction.
    pub direction: ConnectionDirection,
    /// Optional descriptive label.
    #[serde(default)]
    pub label: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// An event classification the presentation layer can filter by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Category {
    /// Identifier matched against [`Event::category`].
    pub id: String,
    /// Human-readable name.
    pub label: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    /// Create a category without a description.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
        }
    }
}

/// A metric the presentation layer knows how to label and bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ImpactType {
    /// Metric name matched against [`Event::impact`] keys.
    pub id: String,
    /// Human-readable name.
    pub label: String,
    /// Minimum allowed value.
    pub min_value: f64,
    /// Maximum allowed value.
    pub max_value: f64,
    /// Display unit.
    pub unit: String,
}

impl ImpactType {
    /// Create an impact type with the standard `0..=200 %` bounds.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min_value: METRIC_MIN,
            max_value: METRIC_MAX,
            unit: String::from("%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_deserializes_from_ui_json() {
        let json = r#"{
            "id": 2,
            "year": 1807,
            "event": "Abolition of Slave Trade",
            "description": "British Parliament passes the Slave Trade Act",
            "impact": { "society": 50, "economy": -10 },
            "effects": [5],
            "causedBy": [1],
            "category": "social"
        }"#;
        let event: Result<Event, _> = serde_json::from_str(json);
        assert!(event.is_ok(), "{event:?}");
        let Ok(event) = event else { return };

        assert_eq!(event.id, EventId(2));
        assert_eq!(event.title, "Abolition of Slave Trade");
        assert_eq!(event.effects, vec![EventId(5)]);
        assert_eq!(event.caused_by, vec![EventId(1)]);
        assert!((event.strength - DEFAULT_STRENGTH).abs() < 1e-12);
        assert_eq!(event.duration, DEFAULT_DURATION_YEARS);
        assert!(event.branch_id.is_none());
        assert!(event.tags.is_empty());
    }

    #[test]
    fn builder_sets_edges_and_impact() {
        let event = Event::new(1, 1800, "technological")
            .with_impact("economy", 30.0)
            .with_effects([2, 4])
            .with_tags(["industry"]);
        assert!(event.affects_metric("economy"));
        assert!(!event.affects_metric("health"));
        assert_eq!(event.effects, vec![EventId(2), EventId(4)]);
        assert!(event.tags.contains("industry"));
    }

    #[test]
    fn has_all_tags_requires_every_tag() {
        let event = Event::new(1, 1800, "social").with_tags(["reform", "law"]);
        let both = [String::from("reform"), String::from("law")];
        let extra = [String::from("reform"), String::from("war")];
        assert!(event.has_all_tags(&both));
        assert!(!event.has_all_tags(&extra));
        assert!(event.has_all_tags(std::iter::empty()));
    }

    #[test]
    fn connection_serializes_kind_as_type() {
        let connection = Connection {
            from: 1800,
            to: 1807,
            kind: ConnectionType::Effect,
            strength: 0.5,
            duration: Some(10),
            direction: ConnectionDirection::Forward,
            label: None,
        };
        let value = serde_json::to_value(&connection).ok();
        let kind = value.as_ref().and_then(|v| v.get("type")).and_then(|v| v.as_str());
        assert_eq!(kind, Some("effect"));
    }

    #[test]
    fn branch_label_prefers_name() {
        let mut branch = TimelineBranch {
            id: BranchId::main(),
            name: None,
            events: Vec::new(),
            parent_branch: None,
            created_at: Utc::now(),
        };
        assert_eq!(branch.label(), "Main Timeline");
        branch.id = BranchId::from("branch-x");
        assert_eq!(branch.label(), "branch-x");
        branch.name = Some(String::from("What if"));
        assert_eq!(branch.label(), "What if");
    }

    #[test]
    fn impact_type_defaults_to_percent_bounds() {
        let impact = ImpactType::new("economy", "Economic Impact");
        assert!((impact.max_value - METRIC_MAX).abs() < 1e-12);
        assert_eq!(impact.unit, "%");
    }
}
