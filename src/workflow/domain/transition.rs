//! Validated commands accepted by the workflow engine.

use super::{Hours, HourlyRate, MilestoneDates, TaskStatus};
use chrono::NaiveDate;

/// Command to move a task to another status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCommand {
    next_status: TaskStatus,
    note: Option<String>,
    status_date: Option<NaiveDate>,
    estimated_hours_override: Option<Hours>,
    delivery_date_override: Option<NaiveDate>,
}

impl TransitionCommand {
    /// Creates a command targeting the given status.
    #[must_use]
    pub const fn new(next_status: TaskStatus) -> Self {
        Self {
            next_status,
            note: None,
            status_date: None,
            estimated_hours_override: None,
            delivery_date_override: None,
        }
    }

    /// Attaches a note; required for rollbacks.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the date the task entered the target status.
    #[must_use]
    pub const fn with_status_date(mut self, date: NaiveDate) -> Self {
        self.status_date = Some(date);
        self
    }

    /// Overrides the estimate as part of the transition.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: Hours) -> Self {
        self.estimated_hours_override = Some(hours);
        self
    }

    /// Supplies the delivery date for a confirmation.
    #[must_use]
    pub const fn with_delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date_override = Some(date);
        self
    }

    /// Returns the target status.
    #[must_use]
    pub const fn next_status(&self) -> TaskStatus {
        self.next_status
    }

    /// Returns the note, trimmed, when it is non-blank.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }

    /// Returns the supplied status date.
    #[must_use]
    pub const fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    /// Returns the estimate override.
    #[must_use]
    pub const fn estimated_hours_override(&self) -> Option<Hours> {
        self.estimated_hours_override
    }

    /// Returns the delivery date override.
    #[must_use]
    pub const fn delivery_date_override(&self) -> Option<NaiveDate> {
        self.delivery_date_override
    }
}

/// Bulk edit of a task from the task-details editor.
///
/// Every field is optional; absent fields are left untouched. Milestone
/// dates are keyed by status through [`MilestoneDates`], and the slot for
/// the target status is required when the edit changes the status.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskEdit {
    /// Replacement title, if editing it.
    pub title: Option<String>,
    /// Replacement client name; `Some(None)` clears it.
    pub client_name: Option<Option<String>>,
    /// Replacement requested date.
    pub requested_date: Option<NaiveDate>,
    /// Replacement change-point list.
    pub change_points: Option<Vec<String>>,
    /// Target status, if the edit moves the task.
    pub status: Option<TaskStatus>,
    /// Milestone dates supplied by the editor, keyed by status slot.
    pub milestone_dates: MilestoneDates,
    /// Replacement estimate.
    pub estimated_hours: Option<Hours>,
    /// Replacement logged hours.
    pub logged_hours: Option<Hours>,
    /// Replacement hourly rate; `Some(None)` clears it.
    pub hourly_rate: Option<Option<HourlyRate>>,
    /// Note recorded in the history ledger; required for rollbacks.
    pub note: Option<String>,
}

impl TaskEdit {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the edit touches only descriptive fields.
    ///
    /// Descriptive fields are the title, client name, requested date, and
    /// change points; clients may edit nothing else.
    #[must_use]
    pub const fn is_descriptive_only(&self) -> bool {
        self.status.is_none()
            && self.estimated_hours.is_none()
            && self.logged_hours.is_none()
            && self.hourly_rate.is_none()
            && matches!(
                self.milestone_dates,
                MilestoneDates {
                    client_review: None,
                    delivery: None,
                    approved: None,
                    started: None,
                    completed: None,
                    handover: None,
                }
            )
    }

    /// Returns the note, trimmed, when it is non-blank.
    #[must_use]
    pub fn trimmed_note(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }
}
