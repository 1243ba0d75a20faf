//! JSON export and validated import of task collections.

use super::record::TaskRecord;
use crate::workflow::domain::ProjectTask;
use mockable::Clock;
use thiserror::Error;

/// Errors returned by the interchange codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterchangeError {
    /// The payload is not valid JSON.
    #[error("malformed JSON payload: {0}")]
    MalformedJson(String),

    /// The payload is valid JSON but not an array.
    #[error("task payload must be a JSON array")]
    NotAnArray,

    /// The payload was a non-empty array yet no element was a valid task.
    #[error("no valid tasks found in the payload")]
    NoValidTasks,

    /// The task collection could not be serialized.
    #[error("failed to serialize tasks: {0}")]
    Serialize(String),
}

/// Exports tasks as a pretty-printed JSON array in the canonical spelling.
///
/// # Errors
///
/// Returns [`InterchangeError::Serialize`] when serialization fails.
pub fn export_tasks(tasks: &[ProjectTask]) -> Result<String, InterchangeError> {
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from_task).collect();
    serde_json::to_string_pretty(&records)
        .map_err(|err| InterchangeError::Serialize(err.to_string()))
}

/// Imports tasks from a JSON array payload.
///
/// Each element is decoded leniently and normalized into a canonical task.
/// Elements that fail to decode or normalize are discarded with a warning;
/// a non-empty payload that yields no valid task at all is a hard error so
/// a wholly broken import never silently empties the task list.
///
/// # Errors
///
/// Returns [`InterchangeError::MalformedJson`],
/// [`InterchangeError::NotAnArray`], or [`InterchangeError::NoValidTasks`].
pub fn import_tasks(payload: &str, clock: &impl Clock) -> Result<Vec<ProjectTask>, InterchangeError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|err| InterchangeError::MalformedJson(err.to_string()))?;
    let serde_json::Value::Array(elements) = value else {
        return Err(InterchangeError::NotAnArray);
    };

    let element_count = elements.len();
    let mut tasks = Vec::with_capacity(element_count);
    for (index, element) in elements.into_iter().enumerate() {
        let record: TaskRecord = match serde_json::from_value(element) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(index, error = %err, "discarding undecodable task record");
                continue;
            }
        };
        match record.normalize(clock) {
            Ok(task) => tasks.push(task),
            Err(err) => {
                tracing::warn!(index, error = %err, "discarding invalid task record");
            }
        }
    }

    if element_count > 0 && tasks.is_empty() {
        return Err(InterchangeError::NoValidTasks);
    }
    Ok(tasks)
}
