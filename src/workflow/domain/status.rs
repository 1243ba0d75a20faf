//! Ordered delivery lifecycle statuses and the transition rule.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery lifecycle status, ordered from intake to handover.
///
/// The declaration order is load-bearing: it defines "forward" for the
/// transition rule and which statuses count as advanced for rollback
/// purposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TaskStatus {
    /// Request captured, nothing agreed yet.
    Requested,
    /// Under review with the client; the only rollback target.
    #[serde(rename = "Client Review")]
    ClientReview,
    /// Scope and delivery date confirmed.
    Confirmed,
    /// Approved for implementation.
    Approved,
    /// Implementation in progress.
    #[serde(rename = "Working On It")]
    WorkingOnIt,
    /// Implementation finished.
    Completed,
    /// Delivered and handed over to the client.
    Handover,
}

/// All statuses in lifecycle order.
pub const ALL_STATUSES: [TaskStatus; 7] = [
    TaskStatus::Requested,
    TaskStatus::ClientReview,
    TaskStatus::Confirmed,
    TaskStatus::Approved,
    TaskStatus::WorkingOnIt,
    TaskStatus::Completed,
    TaskStatus::Handover,
];

impl TaskStatus {
    /// Returns the canonical display/storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "Requested",
            Self::ClientReview => "Client Review",
            Self::Confirmed => "Confirmed",
            Self::Approved => "Approved",
            Self::WorkingOnIt => "Working On It",
            Self::Completed => "Completed",
            Self::Handover => "Handover",
        }
    }

    /// Returns the ordinal position in the lifecycle.
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Requested => 0,
            Self::ClientReview => 1,
            Self::Confirmed => 2,
            Self::Approved => 3,
            Self::WorkingOnIt => 4,
            Self::Completed => 5,
            Self::Handover => 6,
        }
    }

    /// Returns the immediate next status, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Requested => Some(Self::ClientReview),
            Self::ClientReview => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Approved),
            Self::Approved => Some(Self::WorkingOnIt),
            Self::WorkingOnIt => Some(Self::Completed),
            Self::Completed => Some(Self::Handover),
            Self::Handover => None,
        }
    }

    /// Returns `true` for statuses at or past `Confirmed`.
    ///
    /// Advanced statuses require a positive estimate to enter and are the
    /// only legal rollback origins.
    #[must_use]
    pub const fn is_advanced(self) -> bool {
        self.position() >= Self::Confirmed.position()
    }

    /// Decides whether a status change is legal.
    ///
    /// A transition is legal iff it is a no-op re-save, the immediate next
    /// status, or a rollback from an advanced status back to
    /// `ClientReview`. Rollback never targets any other earlier stage.
    #[must_use]
    pub const fn can_transition(from: Self, to: Self) -> bool {
        if from as usize == to as usize {
            return true;
        }
        if let Some(next) = from.next() {
            if next as usize == to as usize {
                return true;
            }
        }
        matches!(to, Self::ClientReview) && from.is_advanced()
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', " ");
        match normalized.as_str() {
            "requested" => Ok(Self::Requested),
            "client review" => Ok(Self::ClientReview),
            "confirmed" => Ok(Self::Confirmed),
            "approved" => Ok(Self::Approved),
            "working on it" => Ok(Self::WorkingOnIt),
            "completed" => Ok(Self::Completed),
            "handover" => Ok(Self::Handover),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
