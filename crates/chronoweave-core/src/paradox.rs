//! Circular-causality ("paradox") detection over `effects` edges.
//!
//! Depth-first traversal with two sets: *explored* (fully or partially
//! visited) and *on path* (the current root-to-node chain). Reaching a node
//! that is on the path closes a cycle; the cycle is recorded at that node and
//! the traversal does not descend into it again.
//!
//! Roots are visited in input order and children in `effects` order, so the
//! report order is deterministic. The traversal keeps its own frame stack
//! instead of recursing, so arbitrarily long effect chains cannot exhaust the
//! call stack.

use std::collections::BTreeSet;

use chronoweave_types::{Event, EventId};

use crate::graph::EventGraph;

/// Format of every paradox message.
pub fn paradox_message(at: EventId) -> String {
    format!("Circular dependency detected at event {at}")
}

/// One frame of the explicit DFS stack.
struct Frame<'a> {
    id: EventId,
    effects: &'a [EventId],
    cursor: usize,
}

/// Return the event at which each detected cycle closes, in discovery order.
///
/// A node may appear more than once if several distinct back edges lead to
/// it. Never fails and always terminates, including on self-loops and
/// dangling ids.
pub fn detect_cycles(events: &[Event]) -> Vec<EventId> {
    let graph = EventGraph::new(events);
    let mut explored: BTreeSet<EventId> = BTreeSet::new();
    let mut on_path: BTreeSet<EventId> = BTreeSet::new();
    let mut cycles: Vec<EventId> = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for root in events {
        visit(root.id, &graph, &mut explored, &mut on_path, &mut cycles, &mut stack);

        while let Some(frame) = stack.last_mut() {
            let next = frame.effects.get(frame.cursor).copied();
            if let Some(child) = next {
                frame.cursor = frame.cursor.saturating_add(1);
                visit(child, &graph, &mut explored, &mut on_path, &mut cycles, &mut stack);
            } else {
                on_path.remove(&frame.id);
                stack.pop();
            }
        }
    }

    cycles
}

/// Enter `id`: record a cycle if it is on the current path, otherwise push a
/// frame for it unless it was already explored.
fn visit<'a>(
    id: EventId,
    graph: &EventGraph<'a>,
    explored: &mut BTreeSet<EventId>,
    on_path: &mut BTreeSet<EventId>,
    cycles: &mut Vec<EventId>,
    stack: &mut Vec<Frame<'a>>,
) {
    if on_path.contains(&id) {
        cycles.push(id);
        return;
    }
    if !explored.insert(id) {
        return;
    }
    on_path.insert(id);
    stack.push(Frame {
        id,
        effects: graph.effects_of(id),
        cursor: 0,
    });
}

/// Report every circular dependency as a human-readable message.
///
/// Each message reads `"Circular dependency detected at event <id>"`.
pub fn detect_paradoxes(events: &[Event]) -> Vec<String> {
    detect_cycles(events).into_iter().map(paradox_message).collect()
}
