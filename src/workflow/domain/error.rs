//! Error types for workflow domain validation.

use super::TaskStatus;
use thiserror::Error;

/// Errors returned while validating workflow operations.
///
/// Every rule violation is detected before any mutation; an error means the
/// task snapshot is untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    /// The status jump violates the ordering/rollback rule.
    #[error("cannot move a task from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// A rollback was attempted without a reason.
    #[error("rolling back to Client Review requires a reason")]
    RollbackReasonRequired,

    /// A status change was attempted without a status date.
    #[error("a status date is required to move a task to {status}")]
    StatusDateRequired {
        /// The status the task was moving to.
        status: TaskStatus,
    },

    /// An advanced status was attempted without a positive estimate.
    #[error("a positive hour estimate is required to move a task to {status}")]
    EstimateRequired {
        /// The status the task was moving to.
        status: TaskStatus,
    },

    /// Confirmation was attempted without ever supplying a delivery date.
    #[error("a delivery date is required to confirm a task")]
    DeliveryDateRequired,

    /// Estimated or logged hours are negative or not finite.
    #[error("invalid hours value: {0}")]
    InvalidHours(f64),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
