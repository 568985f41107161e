//! Branch registry and copy-on-fork.
//!
//! Every branch owns its events outright. Forking deep-copies the source
//! events and stamps each copy with the new branch id, so later changes to
//! one branch can never be observed from another.

use chrono::Utc;
use chronoweave_types::{BranchId, Event, TimelineBranch};
use tracing::info;

use crate::error::EngineError;

/// All branches of a session, in creation order.
///
/// A new registry always contains the `main` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchRegistry {
    branches: Vec<TimelineBranch>,
}

impl BranchRegistry {
    /// Create a registry whose `main` branch holds `events`.
    pub fn new(events: Vec<Event>) -> Self {
        let main = BranchId::main();
        let branch = TimelineBranch {
            events: retag(events, &main),
            id: main,
            name: None,
            parent_branch: None,
            created_at: Utc::now(),
        };
        Self {
            branches: vec![branch],
        }
    }

    /// Fork `events` into a new branch `new_branch_id` whose parent is
    /// `parent_branch_id`.
    ///
    /// The events are cloned; the caller's slice is left untouched. The
    /// parent id is recorded as-is and need not be registered. Returns a
    /// copy of the new branch; edit the registered one through
    /// [`BranchRegistry::get_mut`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateBranch`] if `new_branch_id` is
    /// already registered.
    pub fn fork(
        &mut self,
        events: &[Event],
        new_branch_id: BranchId,
        parent_branch_id: Option<BranchId>,
    ) -> Result<TimelineBranch, EngineError> {
        if self.contains(&new_branch_id) {
            return Err(EngineError::DuplicateBranch(new_branch_id));
        }

        info!(
            branch = %new_branch_id,
            parent = parent_branch_id.as_ref().map(BranchId::as_str),
            events = events.len(),
            "Forked branch"
        );

        let branch = TimelineBranch {
            events: retag(events.to_vec(), &new_branch_id),
            id: new_branch_id,
            name: None,
            parent_branch: parent_branch_id,
            created_at: Utc::now(),
        };
        self.branches.push(branch.clone());
        Ok(branch)
    }

    /// Fork the events of registered branch `parent_id` into `new_branch_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownBranch`] if `parent_id` is not
    /// registered, or [`EngineError::DuplicateBranch`] if `new_branch_id`
    /// is.
    pub fn fork_from(
        &mut self,
        parent_id: &BranchId,
        new_branch_id: BranchId,
    ) -> Result<TimelineBranch, EngineError> {
        let events = self
            .get(parent_id)
            .ok_or_else(|| EngineError::UnknownBranch(parent_id.clone()))?
            .events
            .clone();
        self.fork(&events, new_branch_id, Some(parent_id.clone()))
    }

    /// Look up a branch by id.
    pub fn get(&self, id: &BranchId) -> Option<&TimelineBranch> {
        self.branches.iter().find(|branch| &branch.id == id)
    }

    /// Mutable lookup, for renaming a branch.
    pub fn get_mut(&mut self, id: &BranchId) -> Option<&mut TimelineBranch> {
        self.branches.iter_mut().find(|branch| &branch.id == id)
    }

    /// Whether a branch with this id exists.
    pub fn contains(&self, id: &BranchId) -> bool {
        self.get(id).is_some()
    }

    /// The `main` branch.
    pub fn main(&self) -> Option<&TimelineBranch> {
        self.branches.first()
    }

    /// Branches in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &TimelineBranch> {
        self.branches.iter()
    }

    /// Number of branches, including `main`.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Always false: `main` exists from construction.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl Default for BranchRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// A fresh, collision-resistant branch id (`branch-<uuid v7>`).
pub fn generate_branch_id() -> BranchId {
    BranchId::generate()
}

fn retag(mut events: Vec<Event>, branch: &BranchId) -> Vec<Event> {
    for event in &mut events {
        event.branch_id = Some(branch.clone());
    }
    events
}
