//! Error types for access and approval gating.

use crate::workflow::domain::TaskId;
use thiserror::Error;

/// Errors returned while gating access and approval operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The actor lacks the role or ownership required for the operation.
    #[error("access denied: {action}")]
    AccessDenied {
        /// The operation that was attempted.
        action: &'static str,
    },

    /// The task or its side-record was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}
