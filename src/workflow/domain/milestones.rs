//! Milestone dates, one slot per status reached.

use super::TaskStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date a task entered each lifecycle status.
///
/// `Requested` has no slot (the task's requested date lives on the
/// aggregate); the `Confirmed` slot is the delivery date agreed with the
/// client. Set/clear logic is centralized here so "which dates are set for
/// which statuses reached" stays a checkable invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MilestoneDates {
    /// Date the task entered client review.
    #[serde(default)]
    pub client_review: Option<NaiveDate>,
    /// Delivery date agreed when the task was confirmed.
    #[serde(default)]
    pub delivery: Option<NaiveDate>,
    /// Date the task was approved for implementation.
    #[serde(default)]
    pub approved: Option<NaiveDate>,
    /// Date implementation started.
    #[serde(default)]
    pub started: Option<NaiveDate>,
    /// Date implementation completed.
    #[serde(default)]
    pub completed: Option<NaiveDate>,
    /// Date the task was handed over.
    #[serde(default)]
    pub handover: Option<NaiveDate>,
}

impl MilestoneDates {
    /// Returns the slot for the given status, if the status has one.
    #[must_use]
    pub const fn date_for(&self, status: TaskStatus) -> Option<NaiveDate> {
        match status {
            TaskStatus::Requested => None,
            TaskStatus::ClientReview => self.client_review,
            TaskStatus::Confirmed => self.delivery,
            TaskStatus::Approved => self.approved,
            TaskStatus::WorkingOnIt => self.started,
            TaskStatus::Completed => self.completed,
            TaskStatus::Handover => self.handover,
        }
    }

    /// Sets the slot for the given status, overwriting any existing date.
    ///
    /// Setting a date for `Requested` is a no-op; that status has no slot.
    pub const fn set_for(&mut self, status: TaskStatus, date: NaiveDate) {
        match status {
            TaskStatus::Requested => {}
            TaskStatus::ClientReview => self.client_review = Some(date),
            TaskStatus::Confirmed => self.delivery = Some(date),
            TaskStatus::Approved => self.approved = Some(date),
            TaskStatus::WorkingOnIt => self.started = Some(date),
            TaskStatus::Completed => self.completed = Some(date),
            TaskStatus::Handover => self.handover = Some(date),
        }
    }

    /// Sets the slot for the given status only when it is still empty.
    pub const fn set_if_unset(&mut self, status: TaskStatus, date: NaiveDate) {
        if self.date_for(status).is_none() {
            self.set_for(status, date);
        }
    }

    /// Clears every slot from `Confirmed` onward.
    ///
    /// Used by rollback: a task sent back to client review loses its
    /// delivery commitment and everything derived from it.
    pub const fn clear_from_confirmed(&mut self) {
        self.delivery = None;
        self.approved = None;
        self.started = None;
        self.completed = None;
        self.handover = None;
    }
}
