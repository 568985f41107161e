//! Error types for the `chronoweave-core` crate.
//!
//! Fallible engine operations return [`EngineError`]. Dangling references
//! are deliberately not errors: they surface as
//! [`ValidationIssue`](crate::validation::ValidationIssue)s so a single
//! malformed event never aborts a whole simulation. Paradox and anomaly
//! detection report rather than fail.

use chronoweave_types::BranchId;

/// Errors that can occur during engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A numeric or range parameter is outside its valid domain
    /// (non-positive half-life, negative time delta, `min > max`).
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Explanation of what is wrong with the parameter.
        reason: String,
    },

    /// A branch with this id already exists.
    #[error("duplicate branch id: {0}")]
    DuplicateBranch(BranchId),

    /// No branch with this id is registered.
    #[error("branch not found: {0}")]
    UnknownBranch(BranchId),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidParameter`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}
