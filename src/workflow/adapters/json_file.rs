//! Capability-scoped JSON snapshot store for tasks.
//!
//! Persists the full task collection as one pretty-printed JSON file inside
//! a [`cap_std::fs_utf8::Dir`], so the adapter can only ever touch the
//! directory it was handed. Loads tolerate legacy field spellings through
//! the interchange normalizer; failed writes surface as errors and leave
//! the previous snapshot in place.

use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::workflow::{
    domain::{ProjectTask, TaskId},
    interchange::{export_tasks, import_tasks},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Task store backed by a single JSON snapshot file.
pub struct JsonFileTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    dir: Arc<Dir>,
    file_name: String,
    clock: Arc<C>,
    write_guard: Mutex<()>,
}

impl<C> JsonFileTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a store writing `file_name` inside the given directory.
    #[must_use]
    pub fn new(dir: Dir, file_name: impl Into<String>, clock: Arc<C>) -> Self {
        Self {
            dir: Arc::new(dir),
            file_name: file_name.into(),
            clock,
            write_guard: Mutex::new(()),
        }
    }

    /// Reads and normalizes the snapshot file.
    async fn read_snapshot(&self) -> TaskStoreResult<Vec<ProjectTask>> {
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let clock = Arc::clone(&self.clock);

        run_blocking(move || match dir.read_to_string(&file_name) {
            Ok(payload) => {
                import_tasks(&payload, &*clock).map_err(TaskStoreError::persistence)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(TaskStoreError::persistence(err)),
        })
        .await
    }

    /// Serializes and writes the snapshot file via a temp-file rename.
    async fn write_snapshot(&self, tasks: Vec<ProjectTask>) -> TaskStoreResult<()> {
        let payload = export_tasks(&tasks).map_err(TaskStoreError::persistence)?;
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();

        run_blocking(move || {
            let temp_name = format!("{file_name}.tmp");
            dir.write(&temp_name, payload.as_bytes())
                .map_err(TaskStoreError::persistence)?;
            dir.rename(&temp_name, &dir, &file_name)
                .map_err(TaskStoreError::persistence)
        })
        .await
    }
}

/// Runs a blocking filesystem operation off the async executor.
async fn run_blocking<F, T>(f: F) -> TaskStoreResult<T>
where
    F: FnOnce() -> TaskStoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?
}

#[async_trait]
impl<C> TaskStore for JsonFileTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn load(&self) -> TaskStoreResult<Vec<ProjectTask>> {
        let mut tasks = self.read_snapshot().await?;
        tasks.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
        Ok(tasks)
    }

    async fn replace(&self, tasks: Vec<ProjectTask>) -> TaskStoreResult<()> {
        let _guard = self.write_guard.lock().await;
        self.write_snapshot(tasks).await
    }

    async fn upsert(
        &self,
        task: &ProjectTask,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> TaskStoreResult<()> {
        let _guard = self.write_guard.lock().await;
        let mut tasks = self.read_snapshot().await?;
        let existing = tasks.iter().position(|stored| stored.id() == task.id());

        match (existing, expected_updated_at) {
            (Some(index), Some(expected)) => {
                let actual = tasks
                    .get(index)
                    .map(ProjectTask::updated_at)
                    .unwrap_or(expected);
                if actual != expected {
                    return Err(TaskStoreError::Conflict {
                        task_id: task.id(),
                        expected,
                        actual,
                    });
                }
                if let Some(slot) = tasks.get_mut(index) {
                    *slot = task.clone();
                }
            }
            (Some(_), None) => return Err(TaskStoreError::DuplicateTask(task.id())),
            (None, Some(_)) => return Err(TaskStoreError::NotFound(task.id())),
            (None, None) => tasks.push(task.clone()),
        }

        self.write_snapshot(tasks).await
    }

    async fn remove(&self, task_id: TaskId) -> TaskStoreResult<()> {
        let _guard = self.write_guard.lock().await;
        let mut tasks = self.read_snapshot().await?;
        let before = tasks.len();
        tasks.retain(|task| task.id() != task_id);
        if tasks.len() == before {
            return Err(TaskStoreError::NotFound(task_id));
        }
        self.write_snapshot(tasks).await
    }
}
