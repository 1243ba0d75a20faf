//! Domain model for the delivery workflow.
//!
//! The workflow domain models the ordered status lifecycle, the task
//! aggregate with its milestone dates and append-only ledgers, and the
//! validated commands the engine accepts, while keeping persistence and
//! session concerns outside the domain boundary.

mod cost;
mod error;
mod history;
mod hours;
mod ids;
mod milestones;
mod status;
mod task;
mod transition;

pub use cost::CostSummary;
pub use error::{ParseTaskStatusError, WorkflowError};
pub use history::{HistoryEntry, HourRevision};
pub use hours::{Hours, HourlyRate};
pub use ids::{EntryId, TaskId, TaskTitle};
pub use milestones::MilestoneDates;
pub use status::{ALL_STATUSES, TaskStatus};
pub use task::{NewTask, PersistedTaskData, ProjectTask};
pub use transition::{TaskEdit, TransitionCommand};
