//! Then steps for change request workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use changeflow::access::{domain::ApprovalStatus, ports::MetaStore};
use changeflow::workflow::{
    domain::{Hours, TaskStatus, WorkflowError},
    services::WorkflowServiceError,
};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status: {err}"))?;
    let task = world.current_task()?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the task delivery date is "{date}""#)]
fn task_delivery_date_is(world: &WorkflowWorld, date: String) -> Result<(), eyre::Report> {
    let expected: NaiveDate = date.parse().wrap_err("invalid expected delivery date")?;
    let task = world.current_task()?;

    if task.milestones().delivery != Some(expected) {
        return Err(eyre::eyre!(
            "expected delivery date {expected}, found {:?}",
            task.milestones().delivery
        ));
    }
    Ok(())
}

#[then("the task approval is auto-approved by the manager")]
fn task_is_auto_approved(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    let metas = run_async(world.metas.load()).wrap_err("load metas in scenario assertion")?;
    let meta = metas
        .get(&task.id())
        .ok_or_else(|| eyre::eyre!("missing meta for scenario task"))?;

    if meta.approval_status() != ApprovalStatus::Approved {
        return Err(eyre::eyre!(
            "expected approved meta, found {}",
            meta.approval_status().as_str()
        ));
    }
    if meta.decided_by_user_id() != Some(world.manager.id()) {
        return Err(eyre::eyre!("expected the manager to be the decider"));
    }
    Ok(())
}

#[then("the operation fails because a delivery date is required")]
fn operation_needs_delivery_date(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected a failed operation in the scenario world"))?;

    if !matches!(
        error,
        WorkflowServiceError::Domain(WorkflowError::DeliveryDateRequired)
    ) {
        return Err(eyre::eyre!("expected DeliveryDateRequired, got {error:?}"));
    }
    Ok(())
}

#[then("the task estimate is zeroed")]
fn task_estimate_is_zeroed(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if task.estimated_hours() != Hours::ZERO {
        return Err(eyre::eyre!(
            "expected a zeroed estimate, found {}",
            task.estimated_hours()
        ));
    }
    Ok(())
}

#[then(r#"the last hour revision records {previous} to {next} with reason "{reason}""#)]
fn last_hour_revision_matches(
    world: &WorkflowWorld,
    previous: String,
    next: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let expected_previous: f64 = previous.parse().wrap_err("invalid expected previous hours")?;
    let expected_next: f64 = next.parse().wrap_err("invalid expected next hours")?;
    let task = world.current_task()?;
    let revision = task
        .hour_revisions()
        .last()
        .ok_or_else(|| eyre::eyre!("expected at least one hour revision"))?;

    let matches_figures = revision.previous_estimated_hours()
        == Hours::new(expected_previous).wrap_err("invalid expected previous hours")?
        && revision.next_estimated_hours()
            == Hours::new(expected_next).wrap_err("invalid expected next hours")?;
    if !matches_figures {
        return Err(eyre::eyre!(
            "expected revision {expected_previous} -> {expected_next}, found {} -> {}",
            revision.previous_estimated_hours(),
            revision.next_estimated_hours()
        ));
    }
    if revision.reason() != Some(reason.as_str()) {
        return Err(eyre::eyre!(
            "expected revision reason {reason:?}, found {:?}",
            revision.reason()
        ));
    }
    Ok(())
}
