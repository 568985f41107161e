//! Read-only index over an event slice.
//!
//! Events reference each other by [`EventId`]. [`EventGraph`] resolves those
//! ids against a borrowed slice without taking ownership, which keeps cyclic
//! effect graphs harmless. When ids are duplicated the first occurrence in
//! input order wins; later duplicates are unreachable by id and are reported
//! by [`validate_events`](crate::validation::validate_events).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chronoweave_types::{Event, EventId};

/// Id-indexed view of an event list.
#[derive(Debug, Clone)]
pub struct EventGraph<'a> {
    /// Events in input order.
    events: &'a [Event],
    /// First event for each id.
    by_id: BTreeMap<EventId, &'a Event>,
}

impl<'a> EventGraph<'a> {
    /// Index `events` by id.
    pub fn new(events: &'a [Event]) -> Self {
        let mut by_id = BTreeMap::new();
        for event in events {
            by_id.entry(event.id).or_insert(event);
        }
        Self { events, by_id }
    }

    /// Resolve an id, if it names an event in the set.
    pub fn get(&self, id: EventId) -> Option<&'a Event> {
        self.by_id.get(&id).copied()
    }

    /// Whether `id` resolves.
    pub fn contains(&self, id: EventId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Events in input order.
    pub const fn events(&self) -> &'a [Event] {
        self.events
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Forward edges of `id`; empty when `id` does not resolve.
    pub fn effects_of(&self, id: EventId) -> &'a [EventId] {
        self.get(id)
            .map(|event| event.effects.as_slice())
            .unwrap_or_default()
    }

    /// Whether `to` is reachable from `from` by following one or more
    /// `effects` edges.
    pub fn reaches(&self, from: EventId, to: EventId) -> bool {
        let mut seen: BTreeSet<EventId> = BTreeSet::new();
        let mut queue: VecDeque<EventId> = self.effects_of(from).iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if seen.insert(current) {
                queue.extend(self.effects_of(current).iter().copied());
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<Event> {
        vec![
            Event::new(1, 1800, "a").with_effects([2]),
            Event::new(2, 1810, "b").with_effects([3]),
            Event::new(3, 1820, "c"),
        ]
    }

    #[test]
    fn first_duplicate_wins() {
        let events = vec![Event::new(1, 1800, "first"), Event::new(1, 1900, "second")];
        let graph = EventGraph::new(&events);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(EventId(1)).map(|e| e.category.as_str()), Some("first"));
    }

    #[test]
    fn reachability_follows_effects_transitively() {
        let events = chain();
        let graph = EventGraph::new(&events);
        assert!(graph.reaches(EventId(1), EventId(3)));
        assert!(!graph.reaches(EventId(3), EventId(1)));
        assert!(!graph.reaches(EventId(1), EventId(1)));
    }

    #[test]
    fn reachability_terminates_on_cycles() {
        let events = vec![
            Event::new(1, 1800, "a").with_effects([2]),
            Event::new(2, 1810, "b").with_effects([1]),
        ];
        let graph = EventGraph::new(&events);
        assert!(graph.reaches(EventId(1), EventId(1)));
        assert!(!graph.reaches(EventId(1), EventId(9)));
    }

    #[test]
    fn unresolved_ids_have_no_effects() {
        let events = chain();
        let graph = EventGraph::new(&events);
        assert!(graph.effects_of(EventId(99)).is_empty());
        assert!(!graph.contains(EventId(99)));
    }
}
