//! Pure approval-engine functions.
//!
//! The engine is stateless: every function is a synchronous transformation
//! over task/meta snapshots. Callers own the commit-and-persist step.

mod approval;

pub use approval::{
    MANAGER_EDIT_NOTE, MetaSyncOutcome, apply_edit_side_effect, decide_task_approval,
    ensure_task_meta_sync, meta_for_new_task, visible_tasks,
};
