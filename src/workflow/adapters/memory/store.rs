//! In-memory task store for tests and single-process deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workflow::{
    domain::{ProjectTask, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store with optimistic concurrency checks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<HashMap<TaskId, ProjectTask>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given tasks.
    #[must_use]
    pub fn seeded(tasks: Vec<ProjectTask>) -> Self {
        let state = tasks.into_iter().map(|task| (task.id(), task)).collect();
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn load(&self) -> TaskStoreResult<Vec<ProjectTask>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        let mut tasks: Vec<ProjectTask> = state.values().cloned().collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
        Ok(tasks)
    }

    async fn replace(&self, tasks: Vec<ProjectTask>) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        *state = tasks.into_iter().map(|task| (task.id(), task)).collect();
        Ok(())
    }

    async fn upsert(
        &self,
        task: &ProjectTask,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;

        match (state.get(&task.id()), expected_updated_at) {
            (Some(existing), Some(expected)) => {
                if existing.updated_at() != expected {
                    return Err(TaskStoreError::Conflict {
                        task_id: task.id(),
                        expected,
                        actual: existing.updated_at(),
                    });
                }
            }
            (Some(_), None) => return Err(TaskStoreError::DuplicateTask(task.id())),
            (None, Some(_)) => return Err(TaskStoreError::NotFound(task.id())),
            (None, None) => {}
        }

        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn remove(&self, task_id: TaskId) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        if state.remove(&task_id).is_none() {
            return Err(TaskStoreError::NotFound(task_id));
        }
        Ok(())
    }
}
