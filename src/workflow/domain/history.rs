//! Append-only ledger entries: status history and hour revisions.

use super::{EntryId, Hours, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One entry in a task's status/edit history ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: EntryId,
    status: TaskStatus,
    changed_at: DateTime<Utc>,
    note: Option<String>,
}

impl HistoryEntry {
    /// Creates a ledger entry stamped with the current clock time.
    #[must_use]
    pub fn new(status: TaskStatus, note: Option<String>, clock: &impl Clock) -> Self {
        Self {
            id: EntryId::new(),
            status,
            changed_at: clock.utc(),
            note,
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: EntryId,
        status: TaskStatus,
        changed_at: DateTime<Utc>,
        note: Option<String>,
    ) -> Self {
        Self {
            id,
            status,
            changed_at,
            note,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// Returns the status the task held when the entry was appended.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the entry timestamp.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Returns the entry note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// One entry in a task's estimated-hours revision ledger.
///
/// Appended exactly when the estimated-hours value changes, so the ledger
/// reconstructs every estimate the task ever carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRevision {
    id: EntryId,
    previous_estimated_hours: Hours,
    next_estimated_hours: Hours,
    changed_at: DateTime<Utc>,
    reason: Option<String>,
}

impl HourRevision {
    /// Creates a revision entry stamped with the current clock time.
    #[must_use]
    pub fn new(
        previous_estimated_hours: Hours,
        next_estimated_hours: Hours,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: EntryId::new(),
            previous_estimated_hours,
            next_estimated_hours,
            changed_at: clock.utc(),
            reason,
        }
    }

    /// Reconstructs a revision from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: EntryId,
        previous_estimated_hours: Hours,
        next_estimated_hours: Hours,
        changed_at: DateTime<Utc>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id,
            previous_estimated_hours,
            next_estimated_hours,
            changed_at,
            reason,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// Returns the estimate before the change.
    #[must_use]
    pub const fn previous_estimated_hours(&self) -> Hours {
        self.previous_estimated_hours
    }

    /// Returns the estimate after the change.
    #[must_use]
    pub const fn next_estimated_hours(&self) -> Hours {
        self.next_estimated_hours
    }

    /// Returns the entry timestamp.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Returns the recorded reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}
