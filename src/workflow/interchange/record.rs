//! Tolerant task records and their normalization into domain tasks.

use crate::workflow::domain::{
    EntryId, HistoryEntry, HourRevision, Hours, HourlyRate, MilestoneDates, PersistedTaskData,
    ProjectTask, TaskId, TaskStatus, TaskTitle,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that make a record unusable as a task.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    /// The record has no usable title.
    #[error("record has no title")]
    MissingTitle,

    /// The record's status string is not a known status.
    #[error("record has an unknown status: {0}")]
    InvalidStatus(String),

    /// The record carries negative or non-finite hours.
    #[error("record has invalid hours: {0}")]
    InvalidHours(f64),
}

/// Lenient wire form of a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Entry id; generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Status label at the time of the entry.
    #[serde(default)]
    pub status: Option<String>,
    /// Entry timestamp.
    #[serde(default, alias = "changedAt")]
    pub changed_at: Option<DateTime<Utc>>,
    /// Entry note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Lenient wire form of an hour revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRevisionRecord {
    /// Entry id; generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Estimate before the change.
    #[serde(default, alias = "previousEstimatedHours")]
    pub previous_estimated_hours: Option<f64>,
    /// Estimate after the change.
    #[serde(default, alias = "nextEstimatedHours")]
    pub next_estimated_hours: Option<f64>,
    /// Entry timestamp.
    #[serde(default, alias = "changedAt")]
    pub changed_at: Option<DateTime<Utc>>,
    /// Recorded reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Lenient wire form of a task.
///
/// Every field is optional or defaulted, and camelCase legacy spellings are
/// accepted alongside the canonical snake_case names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task id; generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Task title; required for a usable record.
    #[serde(default)]
    pub title: Option<String>,
    /// Requested change points.
    #[serde(default, alias = "changePoints")]
    pub change_points: Vec<String>,
    /// Date the change was requested.
    #[serde(default, alias = "requestedDate")]
    pub requested_date: Option<NaiveDate>,
    /// Client name.
    #[serde(default, alias = "clientName")]
    pub client_name: Option<String>,
    /// Status label; defaults to `Requested` when absent.
    #[serde(default)]
    pub status: Option<String>,
    /// Date the task entered client review.
    #[serde(default, alias = "clientReviewDate")]
    pub client_review_date: Option<NaiveDate>,
    /// Delivery date agreed at confirmation.
    #[serde(default, alias = "deliveryDate")]
    pub delivery_date: Option<NaiveDate>,
    /// Date the task was approved.
    #[serde(default, alias = "approvedDate")]
    pub approved_date: Option<NaiveDate>,
    /// Date implementation started.
    #[serde(default, alias = "startDate")]
    pub start_date: Option<NaiveDate>,
    /// Date implementation completed.
    #[serde(default, alias = "completedDate")]
    pub completed_date: Option<NaiveDate>,
    /// Date the task was handed over.
    #[serde(default, alias = "handoverDate")]
    pub handover_date: Option<NaiveDate>,
    /// Estimated hours; defaults to zero.
    #[serde(default, alias = "estimatedHours")]
    pub estimated_hours: Option<f64>,
    /// Logged hours; defaults to zero.
    #[serde(default, alias = "loggedHours")]
    pub logged_hours: Option<f64>,
    /// Hourly rate.
    #[serde(default, alias = "hourlyRate")]
    pub hourly_rate: Option<f64>,
    /// Creation timestamp.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Latest mutation timestamp.
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    /// History ledger entries.
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    /// Hour-revision ledger entries.
    #[serde(default, alias = "hourRevisions")]
    pub hour_revisions: Vec<HourRevisionRecord>,
}

impl TaskRecord {
    /// Builds the canonical wire record for a task.
    #[must_use]
    pub fn from_task(task: &ProjectTask) -> Self {
        Self {
            id: Some(task.id().into_inner()),
            title: Some(task.title().as_str().to_owned()),
            change_points: task.change_points().to_vec(),
            requested_date: Some(task.requested_date()),
            client_name: task.client_name().map(str::to_owned),
            status: Some(task.status().as_str().to_owned()),
            client_review_date: task.milestones().client_review,
            delivery_date: task.milestones().delivery,
            approved_date: task.milestones().approved,
            start_date: task.milestones().started,
            completed_date: task.milestones().completed,
            handover_date: task.milestones().handover,
            estimated_hours: Some(task.estimated_hours().value()),
            logged_hours: Some(task.logged_hours().value()),
            hourly_rate: task.hourly_rate().map(HourlyRate::value),
            created_at: Some(task.created_at()),
            updated_at: Some(task.updated_at()),
            history: task
                .history()
                .iter()
                .map(|entry| HistoryRecord {
                    id: Some(entry.id().into_inner()),
                    status: Some(entry.status().as_str().to_owned()),
                    changed_at: Some(entry.changed_at()),
                    note: entry.note().map(str::to_owned),
                })
                .collect(),
            hour_revisions: task
                .hour_revisions()
                .iter()
                .map(|revision| HourRevisionRecord {
                    id: Some(revision.id().into_inner()),
                    previous_estimated_hours: Some(revision.previous_estimated_hours().value()),
                    next_estimated_hours: Some(revision.next_estimated_hours().value()),
                    changed_at: Some(revision.changed_at()),
                    reason: revision.reason().map(str::to_owned),
                })
                .collect(),
        }
    }

    /// Normalizes the record into a canonical domain task.
    ///
    /// Missing fields take their documented defaults; an empty history
    /// ledger is seeded with a creation entry so the non-empty invariant
    /// holds for every task the core ever sees.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the record has no title, an unknown
    /// status string, or negative/non-finite hours.
    pub fn normalize(self, clock: &impl Clock) -> Result<ProjectTask, RecordError> {
        let title = self
            .title
            .as_deref()
            .map(TaskTitle::new)
            .transpose()
            .map_err(|_| RecordError::MissingTitle)?
            .ok_or(RecordError::MissingTitle)?;

        let status = match self.status.as_deref() {
            None => TaskStatus::Requested,
            Some(label) => TaskStatus::try_from(label)
                .map_err(|_| RecordError::InvalidStatus(label.to_owned()))?,
        };

        let estimated_hours = normalize_hours(self.estimated_hours)?;
        let logged_hours = normalize_hours(self.logged_hours)?;
        let hourly_rate = self
            .hourly_rate
            .map(|value| HourlyRate::new(value).map_err(|_| RecordError::InvalidHours(value)))
            .transpose()?;

        let created_at = self.created_at.unwrap_or_else(|| clock.utc());
        let updated_at = self.updated_at.unwrap_or(created_at);
        let requested_date = self.requested_date.unwrap_or_else(|| created_at.date_naive());

        let mut history: Vec<HistoryEntry> = self
            .history
            .into_iter()
            .map(|entry| normalize_history_entry(entry, status, created_at))
            .collect();
        if history.is_empty() {
            history.push(HistoryEntry::from_persisted(
                EntryId::new(),
                TaskStatus::Requested,
                created_at,
                Some("Task created".to_owned()),
            ));
        }

        let hour_revisions = self
            .hour_revisions
            .into_iter()
            .filter_map(|revision| normalize_hour_revision(revision, created_at))
            .collect();

        Ok(ProjectTask::from_persisted(PersistedTaskData {
            id: self.id.map_or_else(TaskId::new, TaskId::from_uuid),
            title,
            change_points: self.change_points,
            requested_date,
            client_name: self.client_name,
            status,
            milestones: MilestoneDates {
                client_review: self.client_review_date,
                delivery: self.delivery_date,
                approved: self.approved_date,
                started: self.start_date,
                completed: self.completed_date,
                handover: self.handover_date,
            },
            estimated_hours,
            logged_hours,
            hourly_rate,
            created_at,
            updated_at,
            history,
            hour_revisions,
        }))
    }
}

/// Normalizes an optional hour figure, defaulting to zero.
fn normalize_hours(value: Option<f64>) -> Result<Hours, RecordError> {
    let raw = value.unwrap_or(0.0);
    Hours::new(raw).map_err(|_| RecordError::InvalidHours(raw))
}

/// Normalizes a history record, defaulting unknown fields.
fn normalize_history_entry(
    record: HistoryRecord,
    task_status: TaskStatus,
    fallback_timestamp: DateTime<Utc>,
) -> HistoryEntry {
    let status = record
        .status
        .as_deref()
        .and_then(|label| TaskStatus::try_from(label).ok())
        .unwrap_or(task_status);
    HistoryEntry::from_persisted(
        record.id.map_or_else(EntryId::new, EntryId::from_uuid),
        status,
        record.changed_at.unwrap_or(fallback_timestamp),
        record.note,
    )
}

/// Normalizes an hour-revision record, dropping unusable entries.
fn normalize_hour_revision(
    record: HourRevisionRecord,
    fallback_timestamp: DateTime<Utc>,
) -> Option<HourRevision> {
    let previous = Hours::new(record.previous_estimated_hours.unwrap_or(0.0)).ok()?;
    let next = Hours::new(record.next_estimated_hours.unwrap_or(0.0)).ok()?;
    Some(HourRevision::from_persisted(
        record.id.map_or_else(EntryId::new, EntryId::from_uuid),
        previous,
        next,
        record.changed_at.unwrap_or(fallback_timestamp),
        record.reason,
    ))
}
