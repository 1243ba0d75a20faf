//! Project task aggregate root and its commit logic.

use super::{
    ALL_STATUSES, HistoryEntry, HourRevision, Hours, HourlyRate, MilestoneDates, TaskEdit, TaskId,
    TaskStatus, TaskTitle, TransitionCommand, WorkflowError,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Reason recorded on hour revisions caused by a plain transition.
const STATUS_UPDATE_REASON: &str = "Status update";

/// Reason recorded on hour revisions caused by a bulk edit without a note.
const EDIT_REASON: &str = "Details updated";

/// Draft payload for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    title: String,
    change_points: Vec<String>,
    requested_date: NaiveDate,
    client_name: Option<String>,
    estimated_hours: Hours,
    hourly_rate: Option<HourlyRate>,
}

impl NewTask {
    /// Creates a draft with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, requested_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            change_points: Vec::new(),
            requested_date,
            client_name: None,
            estimated_hours: Hours::ZERO,
            hourly_rate: None,
        }
    }

    /// Sets the requested change points.
    #[must_use]
    pub fn with_change_points(mut self, points: impl IntoIterator<Item = String>) -> Self {
        self.change_points = points.into_iter().collect();
        self
    }

    /// Sets the client name.
    #[must_use]
    pub fn with_client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Sets the initial estimate.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: Hours) -> Self {
        self.estimated_hours = hours;
        self
    }

    /// Sets the hourly rate.
    #[must_use]
    pub const fn with_hourly_rate(mut self, rate: HourlyRate) -> Self {
        self.hourly_rate = Some(rate);
        self
    }
}

/// Client change request tracked through the delivery workflow.
///
/// Mutated exclusively through the engine operations on this type; every
/// mutation appends to the history ledger and bumps `updated_at`. The
/// ledgers are append-only: entries are never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTask {
    id: TaskId,
    title: TaskTitle,
    change_points: Vec<String>,
    requested_date: NaiveDate,
    client_name: Option<String>,
    status: TaskStatus,
    milestones: MilestoneDates,
    estimated_hours: Hours,
    logged_hours: Hours,
    hourly_rate: Option<HourlyRate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    history: Vec<HistoryEntry>,
    hour_revisions: Vec<HourRevision>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted change points.
    pub change_points: Vec<String>,
    /// Persisted requested date.
    pub requested_date: NaiveDate,
    /// Persisted client name, if any.
    pub client_name: Option<String>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted milestone dates.
    pub milestones: MilestoneDates,
    /// Persisted estimate.
    pub estimated_hours: Hours,
    /// Persisted logged hours.
    pub logged_hours: Hours,
    /// Persisted hourly rate, if any.
    pub hourly_rate: Option<HourlyRate>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted history ledger.
    pub history: Vec<HistoryEntry>,
    /// Persisted hour-revision ledger.
    pub hour_revisions: Vec<HourRevision>,
}

/// Fully validated transition, ready to commit.
struct TransitionPlan {
    to: TaskStatus,
    is_rollback: bool,
    is_change: bool,
    effective_date: Option<NaiveDate>,
    next_estimate: Hours,
    note: Option<String>,
}

impl ProjectTask {
    /// Creates a task in the `Requested` status.
    ///
    /// The history ledger is seeded with a creation entry; when the draft
    /// carries no estimate the entry records that one is still pending.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EmptyTitle`] when the title is blank.
    pub fn new(draft: NewTask, clock: &impl Clock) -> Result<Self, WorkflowError> {
        let title = TaskTitle::new(draft.title)?;
        let timestamp = clock.utc();
        let seed_note = if draft.estimated_hours.is_positive() {
            "Task created"
        } else {
            "Task created (estimate pending)"
        };
        let history = vec![HistoryEntry::new(
            TaskStatus::Requested,
            Some(seed_note.to_owned()),
            clock,
        )];

        Ok(Self {
            id: TaskId::new(),
            title,
            change_points: normalize_points(draft.change_points),
            requested_date: draft.requested_date,
            client_name: draft.client_name,
            status: TaskStatus::Requested,
            milestones: MilestoneDates::default(),
            estimated_hours: draft.estimated_hours,
            logged_hours: Hours::ZERO,
            hourly_rate: draft.hourly_rate,
            created_at: timestamp,
            updated_at: timestamp,
            history,
            hour_revisions: Vec::new(),
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            change_points: data.change_points,
            requested_date: data.requested_date,
            client_name: data.client_name,
            status: data.status,
            milestones: data.milestones,
            estimated_hours: data.estimated_hours,
            logged_hours: data.logged_hours,
            hourly_rate: data.hourly_rate,
            created_at: data.created_at,
            updated_at: data.updated_at,
            history: data.history,
            hour_revisions: data.hour_revisions,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the requested change points.
    #[must_use]
    pub fn change_points(&self) -> &[String] {
        &self.change_points
    }

    /// Returns the date the change was requested.
    #[must_use]
    pub const fn requested_date(&self) -> NaiveDate {
        self.requested_date
    }

    /// Returns the client name, if recorded.
    #[must_use]
    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the milestone dates.
    #[must_use]
    pub const fn milestones(&self) -> &MilestoneDates {
        &self.milestones
    }

    /// Returns the current estimate.
    #[must_use]
    pub const fn estimated_hours(&self) -> Hours {
        self.estimated_hours
    }

    /// Returns the hours logged so far.
    #[must_use]
    pub const fn logged_hours(&self) -> Hours {
        self.logged_hours
    }

    /// Returns the hourly rate, if set.
    #[must_use]
    pub const fn hourly_rate(&self) -> Option<HourlyRate> {
        self.hourly_rate
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the status/edit history ledger, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the hour-revision ledger, oldest first.
    #[must_use]
    pub fn hour_revisions(&self) -> &[HourRevision] {
        &self.hour_revisions
    }

    /// Moves the task to another status.
    ///
    /// Validation fully precedes mutation: on error the task is untouched.
    /// A committed rollback zeroes the estimate, clears every milestone
    /// from `Confirmed` onward, and stamps the client-review date; a
    /// committed forward move stamps the target's milestone slot when it is
    /// still empty. An estimate change appends an hour revision, and every
    /// commit appends a history entry and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidTransition`],
    /// [`WorkflowError::RollbackReasonRequired`],
    /// [`WorkflowError::StatusDateRequired`],
    /// [`WorkflowError::EstimateRequired`], or
    /// [`WorkflowError::DeliveryDateRequired`] when the command violates
    /// the corresponding rule.
    pub fn transition(
        &mut self,
        cmd: &TransitionCommand,
        clock: &impl Clock,
    ) -> Result<(), WorkflowError> {
        let plan = self.plan_transition(cmd)?;
        self.commit(&plan, clock);
        Ok(())
    }

    /// Validates a transition command against the current snapshot.
    fn plan_transition(&self, cmd: &TransitionCommand) -> Result<TransitionPlan, WorkflowError> {
        let to = cmd.next_status();
        if !TaskStatus::can_transition(self.status, to) {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to,
            });
        }

        let is_rollback = matches!(to, TaskStatus::ClientReview) && self.status.is_advanced();
        let note = cmd.note().map(str::to_owned);
        if is_rollback && note.is_none() {
            return Err(WorkflowError::RollbackReasonRequired);
        }

        let is_change = to != self.status;
        let effective_date = if is_change && matches!(to, TaskStatus::Confirmed) {
            // The delivery date doubles as the Confirmed status date. Its
            // absence is reported only after the estimate check so the
            // two-step confirm flow surfaces estimate problems first.
            cmd.delivery_date_override().or(self.milestones.delivery)
        } else {
            cmd.status_date()
        };
        if is_change && !matches!(to, TaskStatus::Confirmed) && effective_date.is_none() {
            return Err(WorkflowError::StatusDateRequired { status: to });
        }

        let next_estimate = if is_rollback {
            Hours::ZERO
        } else {
            cmd.estimated_hours_override().unwrap_or(self.estimated_hours)
        };
        if to.is_advanced() && !next_estimate.is_positive() {
            return Err(WorkflowError::EstimateRequired { status: to });
        }
        if is_change && matches!(to, TaskStatus::Confirmed) && effective_date.is_none() {
            return Err(WorkflowError::DeliveryDateRequired);
        }

        Ok(TransitionPlan {
            to,
            is_rollback,
            is_change,
            effective_date,
            next_estimate,
            note,
        })
    }

    /// Applies a validated transition plan.
    fn commit(&mut self, plan: &TransitionPlan, clock: &impl Clock) {
        let previous_estimate = self.estimated_hours;
        self.status = plan.to;

        if plan.is_rollback {
            self.estimated_hours = Hours::ZERO;
            self.milestones.clear_from_confirmed();
            if let Some(date) = plan.effective_date {
                self.milestones.set_for(TaskStatus::ClientReview, date);
            }
        } else {
            self.estimated_hours = plan.next_estimate;
            if let Some(date) = plan.effective_date {
                self.milestones.set_if_unset(plan.to, date);
            }
        }

        if previous_estimate != self.estimated_hours {
            let reason = if plan.is_rollback {
                plan.note.clone()
            } else {
                Some(STATUS_UPDATE_REASON.to_owned())
            };
            self.hour_revisions.push(HourRevision::new(
                previous_estimate,
                self.estimated_hours,
                reason,
                clock,
            ));
        }

        let entry_note = format_history_note(
            plan.note.as_deref(),
            plan.is_change.then_some(plan.effective_date).flatten(),
        );
        self.history
            .push(HistoryEntry::new(self.status, entry_note, clock));
        self.touch(clock);
    }

    /// Applies a bulk edit from the task-details editor.
    ///
    /// Status changes obey the same rules as [`Self::transition`], with the
    /// milestone date for the target status taken from the edit's
    /// per-status date fields. Other supplied milestone dates overwrite
    /// their slots. Exactly one history entry is appended per edit.
    ///
    /// # Errors
    ///
    /// Returns the same rule violations as [`Self::transition`], plus
    /// [`WorkflowError::EmptyTitle`] for a blank replacement title.
    pub fn apply_edit(&mut self, edit: &TaskEdit, clock: &impl Clock) -> Result<(), WorkflowError> {
        let new_title = edit
            .title
            .as_ref()
            .map(|title| TaskTitle::new(title.clone()))
            .transpose()?;

        let to = edit.status.unwrap_or(self.status);
        if !TaskStatus::can_transition(self.status, to) {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to,
            });
        }

        let is_rollback = matches!(to, TaskStatus::ClientReview) && self.status.is_advanced();
        let note = edit.trimmed_note().map(str::to_owned);
        if is_rollback && note.is_none() {
            return Err(WorkflowError::RollbackReasonRequired);
        }

        let is_change = to != self.status;
        let effective_date = if is_change && matches!(to, TaskStatus::Confirmed) {
            edit.milestone_dates.delivery.or(self.milestones.delivery)
        } else if is_change {
            edit.milestone_dates.date_for(to)
        } else {
            None
        };
        if is_change && !matches!(to, TaskStatus::Confirmed) && effective_date.is_none() {
            return Err(WorkflowError::StatusDateRequired { status: to });
        }

        let next_estimate = if is_rollback {
            Hours::ZERO
        } else {
            edit.estimated_hours.unwrap_or(self.estimated_hours)
        };
        if to.is_advanced() && !next_estimate.is_positive() {
            return Err(WorkflowError::EstimateRequired { status: to });
        }
        if is_change && matches!(to, TaskStatus::Confirmed) && effective_date.is_none() {
            return Err(WorkflowError::DeliveryDateRequired);
        }

        // Validation passed; commit the whole edit.
        if let Some(title) = new_title {
            self.title = title;
        }
        if let Some(client_name) = edit.client_name.clone() {
            self.client_name = client_name;
        }
        if let Some(date) = edit.requested_date {
            self.requested_date = date;
        }
        if let Some(points) = edit.change_points.clone() {
            self.change_points = normalize_points(points);
        }
        for status in ALL_STATUSES {
            if let Some(date) = edit.milestone_dates.date_for(status) {
                self.milestones.set_for(status, date);
            }
        }

        let previous_estimate = self.estimated_hours;
        self.status = to;
        if is_rollback {
            self.estimated_hours = Hours::ZERO;
            self.milestones.clear_from_confirmed();
            if let Some(date) = effective_date {
                self.milestones.set_for(TaskStatus::ClientReview, date);
            }
        } else {
            self.estimated_hours = next_estimate;
        }
        if let Some(logged) = edit.logged_hours {
            self.logged_hours = logged;
        }
        if let Some(rate) = edit.hourly_rate {
            self.hourly_rate = rate;
        }

        if previous_estimate != self.estimated_hours {
            let reason = note.clone().or_else(|| Some(EDIT_REASON.to_owned()));
            self.hour_revisions.push(HourRevision::new(
                previous_estimate,
                self.estimated_hours,
                reason,
                clock,
            ));
        }

        let entry_note =
            format_history_note(note.as_deref(), is_change.then_some(effective_date).flatten());
        self.history
            .push(HistoryEntry::new(self.status, entry_note, clock));
        self.touch(clock);
        Ok(())
    }

    /// Updates effort bookkeeping without touching the workflow state.
    ///
    /// Appends an hour revision exactly when the estimate value changes and
    /// always appends a history entry summarizing the change. A `None` rate
    /// leaves the stored rate untouched.
    pub fn update_hours(
        &mut self,
        estimated_hours: Hours,
        logged_hours: Hours,
        hourly_rate: Option<HourlyRate>,
        reason: Option<String>,
        clock: &impl Clock,
    ) {
        let previous_estimate = self.estimated_hours;
        let previous_logged = self.logged_hours;
        self.estimated_hours = estimated_hours;
        self.logged_hours = logged_hours;
        if hourly_rate.is_some() {
            self.hourly_rate = hourly_rate;
        }

        if previous_estimate != estimated_hours {
            self.hour_revisions.push(HourRevision::new(
                previous_estimate,
                estimated_hours,
                reason.clone(),
                clock,
            ));
        }

        let summary = format!(
            "Hours updated: estimated {previous_estimate} -> {estimated_hours}, logged {previous_logged} -> {logged_hours}"
        );
        let entry_note = match reason {
            Some(reason_text) => format!("{summary} ({reason_text})"),
            None => summary,
        };
        self.history
            .push(HistoryEntry::new(self.status, Some(entry_note), clock));
        self.touch(clock);
    }

    /// Appends a free-form note to the history ledger.
    ///
    /// Used for decisions recorded against the task (for example an
    /// approval rejection) that do not change the workflow state.
    pub fn record_note(&mut self, note: impl Into<String>, clock: &impl Clock) {
        self.history
            .push(HistoryEntry::new(self.status, Some(note.into()), clock));
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Formats a history note with the optional status-date suffix.
fn format_history_note(note: Option<&str>, status_date: Option<NaiveDate>) -> Option<String> {
    match (note, status_date) {
        (Some(note_text), Some(date)) => Some(format!("{note_text} | Status date: {date}")),
        (Some(note_text), None) => Some(note_text.to_owned()),
        (None, Some(date)) => Some(format!("Status date: {date}")),
        (None, None) => None,
    }
}

/// Trims change points and drops blank entries, preserving order.
fn normalize_points(points: Vec<String>) -> Vec<String> {
    points
        .into_iter()
        .map(|point| point.trim().to_owned())
        .filter(|point| !point.is_empty())
        .collect()
}
