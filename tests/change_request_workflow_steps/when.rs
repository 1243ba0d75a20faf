//! When steps for change request workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use changeflow::workflow::{domain::TaskStatus, services::TransitionRequest};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the manager confirms the task with an estimate of {hours} hours and delivery date "{date}""#)]
fn manager_confirms_with_delivery_date(
    world: &mut WorkflowWorld,
    hours: String,
    date: String,
) -> Result<(), eyre::Report> {
    let estimate: f64 = hours.parse().wrap_err("invalid scenario estimate")?;
    let delivery: NaiveDate = date.parse().wrap_err("invalid scenario delivery date")?;
    let task = world.current_task()?;

    let result = run_async(world.service.request_transition(
        &world.manager,
        TransitionRequest::new(task.id(), TaskStatus::Confirmed)
            .with_estimated_hours(estimate)
            .with_delivery_date(delivery),
    ));
    apply_result(world, result);
    Ok(())
}

#[when(r#"the manager tries to confirm the task with an estimate of {hours} hours and no delivery date"#)]
fn manager_confirms_without_delivery_date(
    world: &mut WorkflowWorld,
    hours: String,
) -> Result<(), eyre::Report> {
    let estimate: f64 = hours.parse().wrap_err("invalid scenario estimate")?;
    let task = world.current_task()?;

    let result = run_async(world.service.request_transition(
        &world.manager,
        TransitionRequest::new(task.id(), TaskStatus::Confirmed).with_estimated_hours(estimate),
    ));
    apply_result(world, result);
    Ok(())
}

#[when(r#"the manager rolls the task back with reason "{reason}" on "{date}""#)]
fn manager_rolls_back(
    world: &mut WorkflowWorld,
    reason: String,
    date: String,
) -> Result<(), eyre::Report> {
    let status_date: NaiveDate = date.parse().wrap_err("invalid scenario status date")?;
    let task = world.current_task()?;

    let result = run_async(world.service.request_transition(
        &world.manager,
        TransitionRequest::new(task.id(), TaskStatus::ClientReview)
            .with_note(reason)
            .with_status_date(status_date),
    ));
    apply_result(world, result);
    Ok(())
}

/// Records an operation outcome in the scenario world.
fn apply_result(
    world: &mut WorkflowWorld,
    result: Result<
        changeflow::workflow::domain::ProjectTask,
        changeflow::workflow::services::WorkflowServiceError,
    >,
) {
    match result {
        Ok(task) => {
            world.task = Some(task);
            world.last_error = None;
        }
        Err(err) => world.last_error = Some(err),
    }
}
