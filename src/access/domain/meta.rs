//! Task access meta aggregate: ownership and approval state.

use crate::identity::domain::{AppUser, UserId};
use crate::workflow::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Approval state of a task's side-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting an approval decision.
    Pending,
    /// Approved by a privileged actor or auto-approved by a manager edit.
    Approved,
    /// Rejected by a privileged actor.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for ApprovalStatus {
    type Error = ParseApprovalStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseApprovalStatusError(value.to_owned())),
        }
    }
}

/// Error returned while parsing approval statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown approval status: {0}")]
pub struct ParseApprovalStatusError(pub String);

/// Decision applied to a task's approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Approve the task's current state.
    Approve,
    /// Reject the task's current state.
    Reject,
}

/// Ownership and approval side-record, keyed 1:1 by task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAccessMeta {
    task_id: TaskId,
    owner_user_id: Option<UserId>,
    approval_status: ApprovalStatus,
    decision_note: Option<String>,
    decided_by_user_id: Option<UserId>,
    decided_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted side-record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMetaData {
    /// Task this record belongs to.
    pub task_id: TaskId,
    /// Owning user, if known.
    pub owner_user_id: Option<UserId>,
    /// Persisted approval state.
    pub approval_status: ApprovalStatus,
    /// Persisted decision note, if decided.
    pub decision_note: Option<String>,
    /// Persisted deciding user, if decided.
    pub decided_by_user_id: Option<UserId>,
    /// Persisted decision timestamp, if decided.
    pub decided_at: Option<DateTime<Utc>>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskAccessMeta {
    /// Creates the side-record for a freshly created task.
    ///
    /// The creator becomes the owner. Manager-created tasks start approved;
    /// everything else awaits a decision.
    #[must_use]
    pub fn for_new_task(task_id: TaskId, creator: &AppUser, clock: &impl Clock) -> Self {
        let approval_status = if creator.is_manager() {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Pending
        };
        Self {
            task_id,
            owner_user_id: Some(creator.id()),
            approval_status,
            decision_note: None,
            decided_by_user_id: None,
            decided_at: None,
            updated_at: clock.utc(),
        }
    }

    /// Reconstructs a side-record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMetaData) -> Self {
        Self {
            task_id: data.task_id,
            owner_user_id: data.owner_user_id,
            approval_status: data.approval_status,
            decision_note: data.decision_note,
            decided_by_user_id: data.decided_by_user_id,
            decided_at: data.decided_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task id this record belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the owning user, if known.
    #[must_use]
    pub const fn owner_user_id(&self) -> Option<UserId> {
        self.owner_user_id
    }

    /// Returns the approval state.
    #[must_use]
    pub const fn approval_status(&self) -> ApprovalStatus {
        self.approval_status
    }

    /// Returns the decision note, if decided with one.
    #[must_use]
    pub fn decision_note(&self) -> Option<&str> {
        self.decision_note.as_deref()
    }

    /// Returns the deciding user, if decided.
    #[must_use]
    pub const fn decided_by_user_id(&self) -> Option<UserId> {
        self.decided_by_user_id
    }

    /// Returns the decision timestamp, if decided.
    #[must_use]
    pub const fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the given user owns this task.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_user_id == Some(user_id)
    }

    /// Applies an explicit approval decision.
    ///
    /// Decision fields are set together so a decided record always carries
    /// who decided, when, and why.
    pub fn decide(
        &mut self,
        decision: ApprovalDecision,
        decided_by: UserId,
        note: Option<String>,
        clock: &impl Clock,
    ) {
        self.approval_status = match decision {
            ApprovalDecision::Approve => ApprovalStatus::Approved,
            ApprovalDecision::Reject => ApprovalStatus::Rejected,
        };
        self.decision_note = note;
        self.decided_by_user_id = Some(decided_by);
        self.decided_at = Some(clock.utc());
        self.updated_at = clock.utc();
    }

    /// Resets the approval state to pending, clearing the decision fields.
    pub fn reset_to_pending(&mut self, clock: &impl Clock) {
        self.approval_status = ApprovalStatus::Pending;
        self.decision_note = None;
        self.decided_by_user_id = None;
        self.decided_at = None;
        self.updated_at = clock.utc();
    }
}
