//! Given steps for change request workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use changeflow::workflow::{
    domain::TaskStatus,
    services::{NewTaskRequest, TransitionRequest},
};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("a task created by a client with no estimate")]
fn client_task_without_estimate(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let requested = NaiveDate::from_ymd_opt(2025, 1, 2)
        .ok_or_else(|| eyre::eyre!("invalid fixture date"))?;
    let created = run_async(world.service.create_task(
        &world.client,
        NewTaskRequest::new("Update hero banner", requested),
    ))
    .wrap_err("create task in scenario setup")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"the manager moves the task to "{status}" on "{date}""#)]
fn manager_moves_task(
    world: &mut WorkflowWorld,
    status: String,
    date: String,
) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid scenario status: {err}"))?;
    let status_date: NaiveDate = date
        .parse()
        .wrap_err("invalid scenario status date")?;
    let task = world.current_task()?;

    let moved = run_async(world.service.request_transition(
        &world.manager,
        TransitionRequest::new(task.id(), target).with_status_date(status_date),
    ))
    .wrap_err("transition task in scenario setup")?;
    world.task = Some(moved);
    Ok(())
}

#[given(r#"a task at "Approved" with an estimate of {hours} hours"#)]
fn task_at_approved(world: &mut WorkflowWorld, hours: String) -> Result<(), eyre::Report> {
    let estimate: f64 = hours.parse().wrap_err("invalid scenario estimate")?;
    let requested = NaiveDate::from_ymd_opt(2025, 1, 2)
        .ok_or_else(|| eyre::eyre!("invalid fixture date"))?;

    let created = run_async(world.service.create_task(
        &world.client,
        NewTaskRequest::new("Rework checkout flow", requested),
    ))
    .wrap_err("create task in scenario setup")?;

    let steps = [
        TransitionRequest::new(created.id(), TaskStatus::ClientReview).with_status_date(
            NaiveDate::from_ymd_opt(2025, 1, 3)
                .ok_or_else(|| eyre::eyre!("invalid fixture date"))?,
        ),
        TransitionRequest::new(created.id(), TaskStatus::Confirmed)
            .with_estimated_hours(estimate)
            .with_delivery_date(
                NaiveDate::from_ymd_opt(2025, 1, 10)
                    .ok_or_else(|| eyre::eyre!("invalid fixture date"))?,
            ),
        TransitionRequest::new(created.id(), TaskStatus::Approved).with_status_date(
            NaiveDate::from_ymd_opt(2025, 1, 12)
                .ok_or_else(|| eyre::eyre!("invalid fixture date"))?,
        ),
    ];

    let mut task = created;
    for step in steps {
        task = run_async(world.service.request_transition(&world.manager, step))
            .wrap_err("walk task forward in scenario setup")?;
    }
    world.task = Some(task);
    Ok(())
}
