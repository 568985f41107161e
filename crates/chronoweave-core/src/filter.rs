//! Conjunctive event filtering.
//!
//! An [`EventFilter`] is a set of optional predicates combined with AND. An
//! omitted predicate matches everything, so the default filter keeps every
//! event. Filtering preserves input order.

use std::collections::BTreeSet;

use chronoweave_types::{BranchId, Event};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Inclusive year interval with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearRange")]
pub struct YearRange {
    min: i32,
    max: i32,
}

#[derive(Deserialize)]
struct RawYearRange {
    min: i32,
    max: i32,
}

impl TryFrom<RawYearRange> for YearRange {
    type Error = EngineError;

    fn try_from(raw: RawYearRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl YearRange {
    /// Create `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if `min > max`.
    pub fn new(min: i32, max: i32) -> Result<Self, EngineError> {
        if min > max {
            return Err(EngineError::invalid(format!(
                "year range minimum {min} is after maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Whether `year` lies within the range, bounds included.
    pub const fn contains(self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Overlap of two ranges, or `None` if they are disjoint.
    pub fn intersect(self, other: Self) -> Option<Self> {
        Self::new(self.min.max(other.min), self.max.min(other.max)).ok()
    }
}

/// Optional predicates over events, all of which must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    /// Exact category match.
    #[serde(default)]
    pub category: Option<String>,
    /// The event's impact names this metric.
    #[serde(default)]
    pub impact_type: Option<String>,
    /// The event's year lies in this range.
    #[serde(default)]
    pub year_range: Option<YearRange>,
    /// Every listed tag is present on the event.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// The event is stamped with this branch.
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    /// Further metrics the impact must name, gathered by [`EventFilter::and`].
    #[serde(skip)]
    also_impacts: BTreeSet<String>,
    /// Set when [`EventFilter::and`] combined contradictory predicates.
    #[serde(skip)]
    unsatisfiable: bool,
}

impl EventFilter {
    /// A filter that keeps every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require this category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Require an impact on this metric.
    #[must_use]
    pub fn with_impact_type(mut self, metric: impl Into<String>) -> Self {
        self.impact_type = Some(metric.into());
        self
    }

    /// Require the year to lie in `range`.
    #[must_use]
    pub const fn with_year_range(mut self, range: YearRange) -> Self {
        self.year_range = Some(range);
        self
    }

    /// Require a tag. May be called repeatedly.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Require this branch stamp.
    #[must_use]
    pub fn with_branch(mut self, branch: BranchId) -> Self {
        self.branch_id = Some(branch);
        self
    }

    /// Whether `event` satisfies every predicate.
    pub fn matches(&self, event: &Event) -> bool {
        if self.unsatisfiable {
            return false;
        }
        self.category.as_ref().is_none_or(|c| &event.category == c)
            && self
                .impact_type
                .as_ref()
                .is_none_or(|metric| event.affects_metric(metric))
            && self.also_impacts.iter().all(|metric| event.affects_metric(metric))
            && self.year_range.is_none_or(|range| range.contains(event.year))
            && event.has_all_tags(&self.tags)
            && self
                .branch_id
                .as_ref()
                .is_none_or(|branch| event.branch_id.as_ref() == Some(branch))
    }

    /// The conjunction of two filters.
    ///
    /// Filtering by the result equals filtering by `self` and then by
    /// `other`. Impact types and tags accumulate, since one event can name
    /// several metrics and carry several tags. Conflicting single-valued
    /// predicates (two different categories or branches, disjoint year
    /// ranges) produce a filter that matches nothing.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut unsatisfiable = self.unsatisfiable || other.unsatisfiable;

        let category = merge_exact(self.category, other.category, &mut unsatisfiable);
        let branch_id = merge_exact(self.branch_id, other.branch_id, &mut unsatisfiable);

        let mut also_impacts = self.also_impacts;
        also_impacts.extend(other.also_impacts);
        let impact_type = match (self.impact_type, other.impact_type) {
            (Some(a), Some(b)) => {
                if a != b {
                    also_impacts.insert(b);
                }
                Some(a)
            }
            (a, b) => a.or(b),
        };

        let year_range = match (self.year_range, other.year_range) {
            (Some(a), Some(b)) => {
                let overlap = a.intersect(b);
                if overlap.is_none() {
                    unsatisfiable = true;
                }
                overlap.or(Some(a))
            }
            (a, b) => a.or(b),
        };

        let mut tags = self.tags;
        tags.extend(other.tags);

        Self {
            category,
            impact_type,
            year_range,
            tags,
            branch_id,
            also_impacts,
            unsatisfiable,
        }
    }
}

fn merge_exact<T: PartialEq>(a: Option<T>, b: Option<T>, conflict: &mut bool) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a != b {
                *conflict = true;
            }
            Some(a)
        }
        (a, b) => a.or(b),
    }
}

/// Events matching `filter`, in input order.
pub fn filter(events: &[Event], filter: &EventFilter) -> Vec<Event> {
    events
        .iter()
        .filter(|event| filter.matches(event))
        .cloned()
        .collect()
}
