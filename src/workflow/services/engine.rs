//! Workflow engine service: validated transitions, edits, and approvals.
//!
//! The service is the single seam between the pure domain/engine functions
//! and the persistence ports. Every operation loads a snapshot, validates
//! and mutates in memory, then commits task and side-record together; a
//! failed validation never reaches the stores.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use thiserror::Error;

use crate::access::{
    domain::{AccessError, ApprovalDecision, TaskAccessMeta},
    ports::{MetaStore, MetaStoreError},
    services::{apply_edit_side_effect, ensure_task_meta_sync, meta_for_new_task, visible_tasks},
};
use crate::identity::domain::{AppUser, UserStatus};
use crate::workflow::{
    domain::{
        Hours, HourlyRate, MilestoneDates, NewTask, ProjectTask, TaskEdit, TaskId, TaskStatus,
        TransitionCommand, WorkflowError,
    },
    interchange::{InterchangeError, export_tasks, import_tasks},
    ports::{TaskStore, TaskStoreError},
};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskRequest {
    title: String,
    change_points: Vec<String>,
    requested_date: NaiveDate,
    client_name: Option<String>,
    estimated_hours: Option<f64>,
    hourly_rate: Option<f64>,
}

impl NewTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, requested_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            change_points: Vec::new(),
            requested_date,
            client_name: None,
            estimated_hours: None,
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
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets the hourly rate.
    #[must_use]
    pub const fn with_hourly_rate(mut self, rate: f64) -> Self {
        self.hourly_rate = Some(rate);
        self
    }
}

/// Request payload for moving a task to another status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    task_id: TaskId,
    next_status: TaskStatus,
    note: Option<String>,
    status_date: Option<NaiveDate>,
    estimated_hours: Option<f64>,
    delivery_date: Option<NaiveDate>,
}

impl TransitionRequest {
    /// Creates a request targeting the given status.
    #[must_use]
    pub const fn new(task_id: TaskId, next_status: TaskStatus) -> Self {
        Self {
            task_id,
            next_status,
            note: None,
            status_date: None,
            estimated_hours: None,
            delivery_date: None,
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
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Supplies the delivery date for a confirmation.
    #[must_use]
    pub const fn with_delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }
}

/// Request payload for a bulk edit from the task-details editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditTaskRequest {
    task_id: TaskId,
    title: Option<String>,
    client_name: Option<Option<String>>,
    requested_date: Option<NaiveDate>,
    change_points: Option<Vec<String>>,
    status: Option<TaskStatus>,
    milestone_dates: MilestoneDates,
    estimated_hours: Option<f64>,
    logged_hours: Option<f64>,
    hourly_rate: Option<Option<f64>>,
    note: Option<String>,
}

impl EditTaskRequest {
    /// Creates an empty edit for the given task.
    #[must_use]
    pub fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            title: None,
            client_name: None,
            requested_date: None,
            change_points: None,
            status: None,
            milestone_dates: MilestoneDates::default(),
            estimated_hours: None,
            logged_hours: None,
            hourly_rate: None,
            note: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the client name; pass `None` to clear it.
    #[must_use]
    pub fn with_client_name(mut self, client_name: Option<String>) -> Self {
        self.client_name = Some(client_name);
        self
    }

    /// Replaces the requested date.
    #[must_use]
    pub const fn with_requested_date(mut self, date: NaiveDate) -> Self {
        self.requested_date = Some(date);
        self
    }

    /// Replaces the change points.
    #[must_use]
    pub fn with_change_points(mut self, points: impl IntoIterator<Item = String>) -> Self {
        self.change_points = Some(points.into_iter().collect());
        self
    }

    /// Moves the task to another status as part of the edit.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Supplies the milestone date for a status slot.
    #[must_use]
    pub const fn with_milestone_date(mut self, status: TaskStatus, date: NaiveDate) -> Self {
        self.milestone_dates.set_for(status, date);
        self
    }

    /// Replaces the estimate.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Replaces the logged hours.
    #[must_use]
    pub const fn with_logged_hours(mut self, hours: f64) -> Self {
        self.logged_hours = Some(hours);
        self
    }

    /// Replaces the hourly rate; pass `None` to clear it.
    #[must_use]
    pub const fn with_hourly_rate(mut self, rate: Option<f64>) -> Self {
        self.hourly_rate = Some(rate);
        self
    }

    /// Attaches a note; required for rollbacks.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Request payload for updating effort bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateHoursRequest {
    task_id: TaskId,
    estimated_hours: f64,
    logged_hours: f64,
    hourly_rate: Option<f64>,
    reason: Option<String>,
}

impl UpdateHoursRequest {
    /// Creates a request with the new hour figures.
    #[must_use]
    pub const fn new(task_id: TaskId, estimated_hours: f64, logged_hours: f64) -> Self {
        Self {
            task_id,
            estimated_hours,
            logged_hours,
            hourly_rate: None,
            reason: None,
        }
    }

    /// Sets the hourly rate.
    #[must_use]
    pub const fn with_hourly_rate(mut self, rate: f64) -> Self {
        self.hourly_rate = Some(rate);
        self
    }

    /// Records the reason for the change.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkflowError),
    /// Access or approval gating failed.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// Task store operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskStoreError),
    /// Meta store operation failed.
    #[error(transparent)]
    Metas(#[from] MetaStoreError),
    /// Import/export codec failed.
    #[error(transparent)]
    Interchange(#[from] InterchangeError),
}

/// Result type for workflow service operations.
pub type WorkflowServiceResult<T> = Result<T, WorkflowServiceError>;

/// Workflow orchestration service.
#[derive(Clone)]
pub struct WorkflowService<S, M, C>
where
    S: TaskStore,
    M: MetaStore,
    C: Clock + Send + Sync,
{
    tasks: Arc<S>,
    metas: Arc<M>,
    clock: Arc<C>,
}

impl<S, M, C> WorkflowService<S, M, C>
where
    S: TaskStore,
    M: MetaStore,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub const fn new(tasks: Arc<S>, metas: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            metas,
            clock,
        }
    }

    /// Creates a task owned by the actor.
    ///
    /// Any approved user may create tasks; they start in `Requested` with a
    /// seeded history entry, and the side-record starts approved only for
    /// manager creators.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when validation or persistence
    /// fails.
    pub async fn create_task(
        &self,
        actor: &AppUser,
        request: NewTaskRequest,
    ) -> WorkflowServiceResult<ProjectTask> {
        require_approved(actor)?;

        let mut draft = NewTask::new(request.title, request.requested_date)
            .with_change_points(request.change_points);
        if let Some(client_name) = request.client_name {
            draft = draft.with_client_name(client_name);
        }
        if let Some(hours) = request.estimated_hours {
            draft = draft.with_estimated_hours(Hours::new(hours)?);
        }
        if let Some(rate) = request.hourly_rate {
            draft = draft.with_hourly_rate(HourlyRate::new(rate)?);
        }

        let task = ProjectTask::new(draft, &*self.clock)?;
        self.tasks.upsert(&task, None).await?;

        let mut metas = self.metas.load().await?;
        metas.insert(
            task.id(),
            meta_for_new_task(task.id(), actor, &*self.clock),
        );
        self.metas.replace(metas).await?;
        Ok(task)
    }

    /// Lists the tasks visible to the actor.
    ///
    /// Runs the task/meta reconciliation pass first and persists the
    /// reconciled side-records when they drifted, so reads always see a
    /// consistent pairing.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when the actor is not approved or a
    /// store fails.
    pub async fn list_visible(&self, actor: &AppUser) -> WorkflowServiceResult<Vec<ProjectTask>> {
        require_approved(actor)?;
        let tasks = self.tasks.load().await?;
        let metas = self.synced_metas(&tasks, actor).await?;
        Ok(visible_tasks(&tasks, &metas, actor)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Moves a task to another status.
    ///
    /// Managers may move any task and auto-approve it in the same step;
    /// owners may move their own, which resets the approval gate to
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when the transition violates a
    /// workflow rule, the actor lacks access, the task changed since it was
    /// read, or persistence fails.
    pub async fn request_transition(
        &self,
        actor: &AppUser,
        request: TransitionRequest,
    ) -> WorkflowServiceResult<ProjectTask> {
        require_approved(actor)?;
        let (mut task, mut metas) = self.load_task(request.task_id, actor).await?;
        let token = task.updated_at();
        require_manager_or_owner(actor, metas.get(&task.id()), "moving this task")?;

        let mut cmd = TransitionCommand::new(request.next_status);
        if let Some(note) = request.note {
            cmd = cmd.with_note(note);
        }
        if let Some(date) = request.status_date {
            cmd = cmd.with_status_date(date);
        }
        if let Some(hours) = request.estimated_hours {
            cmd = cmd.with_estimated_hours(Hours::new(hours)?);
        }
        if let Some(date) = request.delivery_date {
            cmd = cmd.with_delivery_date(date);
        }

        task.transition(&cmd, &*self.clock)?;
        if let Some(meta) = metas.get_mut(&task.id()) {
            apply_edit_side_effect(meta, actor, &*self.clock);
        }

        self.persist(&task, token, metas).await?;
        Ok(task)
    }

    /// Applies a bulk edit from the task-details editor.
    ///
    /// Managers may edit any task in full. Clients may edit only their own
    /// tasks and only the descriptive fields; a client edit carrying
    /// workflow fields is denied outright.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when the edit violates a workflow
    /// rule, the actor lacks access, the task changed since it was read, or
    /// persistence fails.
    pub async fn edit_task(
        &self,
        actor: &AppUser,
        request: EditTaskRequest,
    ) -> WorkflowServiceResult<ProjectTask> {
        require_approved(actor)?;
        let (mut task, mut metas) = self.load_task(request.task_id, actor).await?;
        let token = task.updated_at();

        let edit = TaskEdit {
            title: request.title,
            client_name: request.client_name,
            requested_date: request.requested_date,
            change_points: request.change_points,
            status: request.status,
            milestone_dates: request.milestone_dates,
            estimated_hours: request.estimated_hours.map(Hours::new).transpose()?,
            logged_hours: request.logged_hours.map(Hours::new).transpose()?,
            hourly_rate: request
                .hourly_rate
                .map(|rate| rate.map(HourlyRate::new).transpose())
                .transpose()?,
            note: request.note,
        };

        if !actor.is_manager() {
            require_owner(actor, metas.get(&task.id()), "editing this task")?;
            if !edit.is_descriptive_only() {
                return Err(AccessError::AccessDenied {
                    action: "clients may edit only the descriptive task fields",
                }
                .into());
            }
        }

        task.apply_edit(&edit, &*self.clock)?;
        if let Some(meta) = metas.get_mut(&task.id()) {
            apply_edit_side_effect(meta, actor, &*self.clock);
        }

        self.persist(&task, token, metas).await?;
        Ok(task)
    }

    /// Updates effort bookkeeping on a task.
    ///
    /// Manager-only; does not touch the approval gate.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when the hours are invalid, the
    /// actor is not a manager, the task changed since it was read, or
    /// persistence fails.
    pub async fn update_hours(
        &self,
        actor: &AppUser,
        request: UpdateHoursRequest,
    ) -> WorkflowServiceResult<ProjectTask> {
        require_approved(actor)?;
        require_manager(actor, "managing task hours")?;

        let estimated = Hours::new(request.estimated_hours)?;
        let logged = Hours::new(request.logged_hours)?;
        let rate = request.hourly_rate.map(HourlyRate::new).transpose()?;

        let (mut task, _metas) = self.load_task(request.task_id, actor).await?;
        let token = task.updated_at();
        task.update_hours(estimated, logged, rate, request.reason, &*self.clock);

        self.persist_task(&task, Some(token)).await?;
        Ok(task)
    }

    /// Applies an explicit approval decision to a task.
    ///
    /// Super-user only. A rejection appends a history entry to the task;
    /// the workflow state itself is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when the actor lacks the role, the
    /// task is missing, or persistence fails.
    pub async fn decide_approval(
        &self,
        actor: &AppUser,
        task_id: TaskId,
        decision: ApprovalDecision,
        note: Option<String>,
    ) -> WorkflowServiceResult<TaskAccessMeta> {
        require_approved(actor)?;
        let (mut task, mut metas) = self.load_task(task_id, actor).await?;
        let token = task.updated_at();
        let mut meta = metas
            .get(&task_id)
            .cloned()
            .ok_or(AccessError::NotFound(task_id))?;

        crate::access::services::decide_task_approval(
            &mut task,
            &mut meta,
            actor,
            decision,
            note,
            &*self.clock,
        )?;

        metas.insert(task_id, meta.clone());
        self.persist(&task, token, metas).await?;
        Ok(meta)
    }

    /// Deletes a task and its side-record together.
    ///
    /// Managers may delete any task; owners may delete their own.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when the actor lacks access, the
    /// task is missing, or persistence fails.
    pub async fn delete_task(&self, actor: &AppUser, task_id: TaskId) -> WorkflowServiceResult<()> {
        require_approved(actor)?;
        let (task, mut metas) = self.load_task(task_id, actor).await?;
        require_manager_or_owner(actor, metas.get(&task.id()), "deleting this task")?;

        self.tasks.remove(task_id).await?;
        metas.remove(&task_id);
        self.metas.replace(metas).await?;
        Ok(())
    }

    /// Exports the actor's visible tasks as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when listing or serialization
    /// fails.
    pub async fn export_visible(&self, actor: &AppUser) -> WorkflowServiceResult<String> {
        let tasks = self.list_visible(actor).await?;
        Ok(export_tasks(&tasks)?)
    }

    /// Imports a task collection, replacing the stored one.
    ///
    /// Manager-only. Invalid elements are discarded by the codec; the
    /// side-records are reconciled immediately so every imported task gets
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError`] when the payload is malformed,
    /// yields no valid tasks, the actor is not a manager, or persistence
    /// fails.
    pub async fn import_replace(
        &self,
        actor: &AppUser,
        payload: &str,
    ) -> WorkflowServiceResult<Vec<ProjectTask>> {
        require_approved(actor)?;
        require_manager(actor, "importing tasks")?;

        let tasks = import_tasks(payload, &*self.clock)?;
        self.tasks.replace(tasks.clone()).await?;
        self.synced_metas(&tasks, actor).await?;
        Ok(tasks)
    }

    /// Loads a task snapshot and the reconciled side-record collection.
    async fn load_task(
        &self,
        task_id: TaskId,
        actor: &AppUser,
    ) -> WorkflowServiceResult<(
        ProjectTask,
        std::collections::HashMap<TaskId, TaskAccessMeta>,
    )> {
        let tasks = self.tasks.load().await?;
        let metas = self.synced_metas(&tasks, actor).await?;
        let task = tasks
            .into_iter()
            .find(|task| task.id() == task_id)
            .ok_or(AccessError::NotFound(task_id))?;
        Ok((task, metas))
    }

    /// Reconciles side-records against a task snapshot, persisting drift.
    async fn synced_metas(
        &self,
        tasks: &[ProjectTask],
        actor: &AppUser,
    ) -> WorkflowServiceResult<std::collections::HashMap<TaskId, TaskAccessMeta>> {
        let stored = self.metas.load().await?;
        let outcome = ensure_task_meta_sync(tasks, actor, &stored, &*self.clock);
        if outcome.changed {
            self.metas.replace(outcome.next.clone()).await?;
        }
        Ok(outcome.next)
    }

    /// Persists a mutated task and the side-record collection.
    async fn persist(
        &self,
        task: &ProjectTask,
        token: DateTime<Utc>,
        metas: std::collections::HashMap<TaskId, TaskAccessMeta>,
    ) -> WorkflowServiceResult<()> {
        self.persist_task(task, Some(token)).await?;
        self.metas.replace(metas).await?;
        Ok(())
    }

    /// Persists a task, surfacing conflicts and store failures.
    async fn persist_task(
        &self,
        task: &ProjectTask,
        token: Option<DateTime<Utc>>,
    ) -> WorkflowServiceResult<()> {
        if let Err(err) = self.tasks.upsert(task, token).await {
            tracing::warn!(task_id = %task.id(), error = %err, "task write did not take effect");
            return Err(err.into());
        }
        Ok(())
    }
}

/// Gates workflow operations to approved accounts.
fn require_approved(actor: &AppUser) -> Result<(), AccessError> {
    if actor.status() != UserStatus::Approved {
        return Err(AccessError::AccessDenied {
            action: "only approved accounts may use the workflow",
        });
    }
    Ok(())
}

/// Gates an operation to managers.
fn require_manager(actor: &AppUser, action: &'static str) -> Result<(), AccessError> {
    if !actor.is_manager() {
        return Err(AccessError::AccessDenied { action });
    }
    Ok(())
}

/// Gates an operation to managers or the task's owner.
fn require_manager_or_owner(
    actor: &AppUser,
    meta: Option<&TaskAccessMeta>,
    action: &'static str,
) -> Result<(), AccessError> {
    if actor.is_manager() {
        return Ok(());
    }
    require_owner(actor, meta, action)
}

/// Gates an operation to the task's owner.
fn require_owner(
    actor: &AppUser,
    meta: Option<&TaskAccessMeta>,
    action: &'static str,
) -> Result<(), AccessError> {
    if meta.is_some_and(|meta| meta.is_owned_by(actor.id())) {
        return Ok(());
    }
    Err(AccessError::AccessDenied { action })
}
