//! Task store port with explicit optimistic concurrency.

use crate::workflow::domain::{ProjectTask, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Writers pass the `updated_at` they read so concurrent edits surface as a
/// [`TaskStoreError::Conflict`] instead of silently losing one side's
/// write. `replace` is the bulk path used by imports; `upsert` is the
/// single-task path used by the engine.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Loads all tasks, ordered by creation time.
    async fn load(&self) -> TaskStoreResult<Vec<ProjectTask>>;

    /// Replaces the stored task collection.
    async fn replace(&self, tasks: Vec<ProjectTask>) -> TaskStoreResult<()>;

    /// Inserts or updates a single task.
    ///
    /// With `expected_updated_at = None` the task must be new; with
    /// `Some(token)` the stored task's `updated_at` must equal the token.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Conflict`] on a token mismatch and
    /// [`TaskStoreError::NotFound`] when a token was passed but the task
    /// does not exist.
    async fn upsert(
        &self,
        task: &ProjectTask,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> TaskStoreResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn remove(&self, task_id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task changed since it was read.
    #[error("task {task_id} changed since it was read (expected {expected}, found {actual})")]
    Conflict {
        /// The task that conflicted.
        task_id: TaskId,
        /// The `updated_at` the writer read.
        expected: DateTime<Utc>,
        /// The `updated_at` currently stored.
        actual: DateTime<Utc>,
    },

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
