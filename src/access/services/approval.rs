//! Visibility, approval decisions, and task/meta reconciliation.

use std::collections::HashMap;

use crate::access::domain::{AccessError, ApprovalDecision, TaskAccessMeta};
use crate::identity::domain::AppUser;
use crate::workflow::domain::{ProjectTask, TaskId};
use mockable::Clock;

/// System note recorded when a manager edit auto-approves a task.
pub const MANAGER_EDIT_NOTE: &str = "Workflow updated by manager";

/// Filters tasks down to those the user may see.
///
/// Managers see every task; everyone else sees only tasks whose
/// side-record names them as owner. Tasks with no side-record are hidden
/// from non-managers until the reconciliation pass has run.
#[must_use]
pub fn visible_tasks<'a>(
    tasks: &'a [ProjectTask],
    metas: &HashMap<TaskId, TaskAccessMeta>,
    user: &AppUser,
) -> Vec<&'a ProjectTask> {
    if user.is_manager() {
        return tasks.iter().collect();
    }
    tasks
        .iter()
        .filter(|task| {
            metas
                .get(&task.id())
                .is_some_and(|meta| meta.is_owned_by(user.id()))
        })
        .collect()
}

/// Builds the side-record for a freshly created task.
#[must_use]
pub fn meta_for_new_task(task_id: TaskId, creator: &AppUser, clock: &impl Clock) -> TaskAccessMeta {
    TaskAccessMeta::for_new_task(task_id, creator, clock)
}

/// Applies an explicit approval decision to a task's side-record.
///
/// Only the super user role may decide. A rejection also appends a
/// "rejected" history entry to the task so the ledger records the decision;
/// the task's workflow state itself is not reverted.
///
/// # Errors
///
/// Returns [`AccessError::AccessDenied`] for non-super-user actors and
/// [`AccessError::NotFound`] when the side-record does not belong to the
/// task.
pub fn decide_task_approval(
    task: &mut ProjectTask,
    meta: &mut TaskAccessMeta,
    actor: &AppUser,
    decision: ApprovalDecision,
    note: Option<String>,
    clock: &impl Clock,
) -> Result<(), AccessError> {
    if !actor.is_super_user() {
        return Err(AccessError::AccessDenied {
            action: "deciding task approvals requires the super user role",
        });
    }
    if meta.task_id() != task.id() {
        return Err(AccessError::NotFound(task.id()));
    }

    meta.decide(decision, actor.id(), note.clone(), clock);
    if matches!(decision, ApprovalDecision::Reject) {
        let entry_note = note.map_or_else(
            || "Approval rejected".to_owned(),
            |reason| format!("Approval rejected: {reason}"),
        );
        task.record_note(entry_note, clock);
    }
    Ok(())
}

/// Applies the approval side effect of a workflow edit or transition.
///
/// Manager edits auto-approve with a system note; any other actor's edit
/// resets the record to pending so it re-enters the approval gate.
pub fn apply_edit_side_effect(meta: &mut TaskAccessMeta, actor: &AppUser, clock: &impl Clock) {
    if actor.is_manager() {
        meta.decide(
            ApprovalDecision::Approve,
            actor.id(),
            Some(MANAGER_EDIT_NOTE.to_owned()),
            clock,
        );
    } else {
        meta.reset_to_pending(clock);
    }
}

/// Outcome of a task/meta reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaSyncOutcome {
    /// `true` when the pass synthesized or pruned any record.
    pub changed: bool,
    /// The reconciled side-record collection.
    pub next: HashMap<TaskId, TaskAccessMeta>,
}

/// Reconciles the side-record collection against the task collection.
///
/// Tasks and side-records are persisted separately and can drift: imports
/// bring tasks without records, deletes can leave records behind. Every
/// task lacking a record gets one synthesized (owner = current user,
/// approval per the new-task rule); records whose task no longer exists are
/// pruned. Runs after every load, import, and login; running it twice over
/// its own output reports `changed = false`.
#[must_use]
pub fn ensure_task_meta_sync(
    tasks: &[ProjectTask],
    current_user: &AppUser,
    metas: &HashMap<TaskId, TaskAccessMeta>,
    clock: &impl Clock,
) -> MetaSyncOutcome {
    let mut next: HashMap<TaskId, TaskAccessMeta> = HashMap::new();
    let mut changed = false;

    for task in tasks {
        match metas.get(&task.id()) {
            Some(meta) => {
                next.insert(task.id(), meta.clone());
            }
            None => {
                tracing::warn!(task_id = %task.id(), "task has no access meta; synthesizing one");
                next.insert(task.id(), meta_for_new_task(task.id(), current_user, clock));
                changed = true;
            }
        }
    }

    for task_id in metas.keys().filter(|task_id| !next.contains_key(*task_id)) {
        tracing::warn!(task_id = %task_id, "pruning orphaned access meta");
        changed = true;
    }

    MetaSyncOutcome { changed, next }
}
