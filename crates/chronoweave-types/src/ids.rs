//! Type-safe identifier wrappers.
//!
//! Events are addressed by small stable integers supplied with the data set,
//! so [`EventId`] wraps a `u32`. Branches are addressed by human-readable
//! strings (`"main"`, `"branch-<uuid>"`), so [`BranchId`] wraps a [`String`].
//! Edge lists store these ids, never references, which keeps cyclic effect
//! graphs representable without any ownership hazard.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Name of the branch that exists at process start.
pub const MAIN_BRANCH: &str = "main";

/// Unique, stable identifier of a historical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventId(pub u32);

impl EventId {
    /// Return the inner integer value.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EventId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<EventId> for u32 {
    fn from(id: EventId) -> Self {
        id.0
    }
}

/// Unique identifier of a timeline branch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BranchId(pub String);

impl BranchId {
    /// The default branch every registry starts with.
    pub fn main() -> Self {
        Self(MAIN_BRANCH.to_owned())
    }

    /// Generate a fresh branch identifier of the form `branch-<uuid v7>`.
    ///
    /// UUID v7 is time-ordered, so generated ids sort by creation time.
    pub fn generate() -> Self {
        Self(format!("branch-{}", Uuid::now_v7()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the default `main` branch.
    pub fn is_main(&self) -> bool {
        self.0 == MAIN_BRANCH
    }
}

impl core::fmt::Display for BranchId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BranchId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for BranchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&EventId(42)).ok();
        assert_eq!(json.as_deref(), Some("42"));
    }

    #[test]
    fn branch_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&BranchId::main()).ok();
        assert_eq!(json.as_deref(), Some("\"main\""));
    }

    #[test]
    fn generated_branch_ids_are_distinct() {
        let a = BranchId::generate();
        let b = BranchId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("branch-"));
        assert!(!a.is_main());
    }

    #[test]
    fn display_matches_inner() {
        assert_eq!(EventId(7).to_string(), "7");
        assert_eq!(BranchId::from("alt").to_string(), "alt");
    }
}
