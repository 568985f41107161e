//! Enumeration types shared between the engine and the presentation layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Kind of a derived [`Connection`](crate::Connection) between two years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ConnectionType {
    /// A direct `effects` edge from an event to one it influences.
    Effect,
    /// A `caused_by` edge from a cause to the event it produced.
    Dependency,
    /// An `effects` edge that closes a cycle in the effect graph.
    Paradox,
    /// A multi-hop influence reached through two or more `effects` edges.
    Indirect,
}

/// Temporal direction of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ConnectionDirection {
    /// The target lies later in time than the source.
    Forward,
    /// The target lies earlier in time than the source.
    Backward,
    /// Source and target share the same year.
    Bidirectional,
}

impl ConnectionDirection {
    /// Derive the direction of an edge from its endpoint years.
    pub const fn between(from_year: i32, to_year: i32) -> Self {
        if to_year > from_year {
            Self::Forward
        } else if to_year < from_year {
            Self::Backward
        } else {
            Self::Bidirectional
        }
    }
}

/// Which adjacency list of an event a reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum EdgeKind {
    /// Forward edge stored in `effects`.
    Effects,
    /// Back edge stored in `caused_by`.
    CausedBy,
}

impl core::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Effects => f.write_str("effects"),
            Self::CausedBy => f.write_str("causedBy"),
        }
    }
}
