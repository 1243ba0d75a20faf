//! Error types for identity domain validation and gating.

use super::UserId;
use thiserror::Error;

/// Errors returned while constructing and gating identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The user name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyName,

    /// The email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// A user with the same email address already exists.
    #[error("an account already exists for {0}")]
    DuplicateEmail(String),

    /// No user matches the given identifier or email.
    #[error("no account found for {0}")]
    NotFound(String),

    /// The account exists but has not been approved yet.
    #[error("your registration is awaiting approval by an administrator")]
    RegistrationPending,

    /// The account registration was rejected.
    #[error("your registration was rejected{}", format_reason(.reason))]
    RegistrationRejected {
        /// Reason recorded by the rejecting administrator, if any.
        reason: Option<String>,
    },

    /// The registration decision was already made.
    #[error("registration for user {0} has already been decided")]
    AlreadyDecided(UserId),

    /// The actor lacks the privilege required for the attempted operation.
    #[error("access denied: {action} requires the super user role")]
    AccessDenied {
        /// The operation that was attempted.
        action: &'static str,
    },
}

/// Formats an optional rejection reason for the error display.
fn format_reason(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

/// Error returned while parsing privilege roles from persistence or claims.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing user statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user status: {0}")]
pub struct ParseUserStatusError(pub String);
