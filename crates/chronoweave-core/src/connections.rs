//! Derivation of display connections from an event's edges.
//!
//! Connections are recomputed on demand and never stored. Only resolvable
//! references produce connections; dangling ids are left to validation.

use std::collections::{BTreeSet, VecDeque};

use chronoweave_types::{Connection, ConnectionDirection, ConnectionType, Event, EventId};

use crate::graph::EventGraph;

/// Direct connections of `event`: its effects followed by its causes.
///
/// An effect edge whose target can reach `event` again through `effects`
/// closes a cycle and is typed [`ConnectionType::Paradox`].
pub fn event_connections(event: &Event, events: &[Event]) -> Vec<Connection> {
    let graph = EventGraph::new(events);
    let mut connections = Vec::with_capacity(event.effects.len().saturating_add(event.caused_by.len()));

    for &effect_id in &event.effects {
        let Some(target) = graph.get(effect_id) else {
            continue;
        };
        let kind = if target.id == event.id || graph.reaches(target.id, event.id) {
            ConnectionType::Paradox
        } else {
            ConnectionType::Effect
        };
        connections.push(Connection {
            from: event.year,
            to: target.year,
            kind,
            strength: event.strength,
            duration: Some(event.duration),
            direction: ConnectionDirection::between(event.year, target.year),
            label: title_of(target),
        });
    }

    for &cause_id in &event.caused_by {
        let Some(cause) = graph.get(cause_id) else {
            continue;
        };
        connections.push(Connection {
            from: cause.year,
            to: event.year,
            kind: ConnectionType::Dependency,
            strength: cause.strength,
            duration: Some(cause.duration),
            direction: ConnectionDirection::between(cause.year, event.year),
            label: title_of(cause),
        });
    }

    connections
}

/// Multi-hop influences of `event`, up to `max_depth` edges away.
///
/// Breadth-first over `effects`; each event is reported once, at the depth
/// where it is first discovered, and only if that depth is at least 2.
/// Strength is the product of the source strengths along the path.
pub fn indirect_connections(event: &Event, events: &[Event], max_depth: usize) -> Vec<Connection> {
    let graph = EventGraph::new(events);
    let mut discovered: BTreeSet<EventId> = BTreeSet::from([event.id]);
    let mut queue: VecDeque<(&Event, usize, f64)> = VecDeque::from([(event, 0, 1.0)]);
    let mut connections = Vec::new();

    while let Some((current, depth, strength)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let next_depth = depth.saturating_add(1);
        let next_strength = strength * current.strength;

        for &effect_id in &current.effects {
            let Some(target) = graph.get(effect_id) else {
                continue;
            };
            if !discovered.insert(target.id) {
                continue;
            }
            if next_depth >= 2 {
                connections.push(Connection {
                    from: event.year,
                    to: target.year,
                    kind: ConnectionType::Indirect,
                    strength: next_strength,
                    duration: None,
                    direction: ConnectionDirection::between(event.year, target.year),
                    label: title_of(target),
                });
            }
            queue.push_back((target, next_depth, next_strength));
        }
    }

    connections
}

fn title_of(event: &Event) -> Option<String> {
    (!event.title.is_empty()).then(|| event.title.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn events() -> Vec<Event> {
        vec![
            Event::new(1, 1800, "a")
                .with_title("Industrial Revolution Peak", "")
                .with_effects([2, 99])
                .with_strength(0.8),
            Event::new(2, 1807, "b")
                .with_title("Abolition", "")
                .with_effects([3])
                .with_caused_by([1])
                .with_strength(0.5),
            Event::new(3, 1830, "c").with_effects([4]).with_caused_by([2]),
            Event::new(4, 1840, "d"),
        ]
    }

    #[test]
    fn effects_then_causes() {
        let all = events();
        let Some(abolition) = all.get(1) else { return };
        let connections = event_connections(abolition, &all);
        assert_eq!(connections.len(), 2);

        let Some(effect) = connections.first() else { return };
        assert_eq!(effect.kind, ConnectionType::Effect);
        assert_eq!((effect.from, effect.to), (1807, 1830));
        assert_eq!(effect.direction, ConnectionDirection::Forward);
        assert_eq!(effect.label, None);

        let Some(cause) = connections.get(1) else { return };
        assert_eq!(cause.kind, ConnectionType::Dependency);
        assert_eq!((cause.from, cause.to), (1800, 1807));
        assert!(close(cause.strength, 0.8));
        assert_eq!(cause.label.as_deref(), Some("Industrial Revolution Peak"));
    }

    #[test]
    fn dangling_effects_produce_nothing() {
        let all = events();
        let Some(first) = all.first() else { return };
        assert_eq!(event_connections(first, &all).len(), 1);
    }

    #[test]
    fn cycle_closing_edges_are_paradoxes() {
        let all = vec![
            Event::new(1, 1800, "a").with_effects([2]),
            Event::new(2, 1790, "b").with_effects([1]),
            Event::new(3, 1790, "c").with_effects([3]),
        ];
        let Some(first) = all.first() else { return };
        let connections = event_connections(first, &all);
        assert!(matches!(
            connections.first(),
            Some(Connection { kind: ConnectionType::Paradox, direction: ConnectionDirection::Backward, .. })
        ));

        let Some(selfish) = all.get(2) else { return };
        let connections = event_connections(selfish, &all);
        assert!(matches!(
            connections.first(),
            Some(Connection { kind: ConnectionType::Paradox, direction: ConnectionDirection::Bidirectional, .. })
        ));
    }

    #[test]
    fn indirect_edges_skip_direct_neighbours() {
        let all = events();
        let Some(first) = all.first() else { return };
        let indirect = indirect_connections(first, &all, 5);
        let targets: Vec<i32> = indirect.iter().map(|c| c.to).collect();
        assert_eq!(targets, vec![1830, 1840]);

        // 0.8 * 0.5, then * 0.5 (event 3 has the default strength)
        assert!(indirect.first().is_some_and(|c| close(c.strength, 0.4)));
        assert!(indirect.get(1).is_some_and(|c| close(c.strength, 0.2)));
        assert!(indirect.iter().all(|c| c.kind == ConnectionType::Indirect));
    }

    #[test]
    fn indirect_depth_is_bounded() {
        let all = events();
        let Some(first) = all.first() else { return };
        assert_eq!(indirect_connections(first, &all, 2).len(), 1);
        assert!(indirect_connections(first, &all, 1).is_empty());
    }

    #[test]
    fn indirect_search_terminates_on_cycles() {
        let all = vec![
            Event::new(1, 1800, "a").with_effects([2]),
            Event::new(2, 1810, "b").with_effects([3]),
            Event::new(3, 1820, "c").with_effects([1]),
        ];
        let Some(first) = all.first() else { return };
        assert_eq!(indirect_connections(first, &all, 10).len(), 1);
    }
}
