//! Service orchestration tests for the workflow engine.

use std::sync::Arc;

use super::fixtures::{approved_user, date, pending_user};
use crate::access::{
    adapters::memory::InMemoryMetaStore,
    domain::{AccessError, ApprovalDecision, ApprovalStatus},
    ports::MetaStore,
    services::MANAGER_EDIT_NOTE,
};
use crate::identity::domain::Role;
use crate::workflow::{
    adapters::memory::InMemoryTaskStore,
    domain::{ProjectTask, TaskId, TaskStatus, WorkflowError},
    ports::{TaskStore, TaskStoreError},
    services::{
        EditTaskRequest, NewTaskRequest, TransitionRequest, UpdateHoursRequest, WorkflowService,
        WorkflowServiceError,
    },
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = WorkflowService<InMemoryTaskStore, InMemoryMetaStore, DefaultClock>;

struct Harness {
    service: TestService,
    tasks: InMemoryTaskStore,
    metas: InMemoryMetaStore,
}

#[fixture]
fn harness() -> Harness {
    let tasks = InMemoryTaskStore::new();
    let metas = InMemoryMetaStore::new();
    let service = WorkflowService::new(
        Arc::new(tasks.clone()),
        Arc::new(metas.clone()),
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        tasks,
        metas,
    }
}

fn new_task_request() -> NewTaskRequest {
    NewTaskRequest::new("Update hero banner", date(2025, 1, 2))
        .with_change_points(vec!["Swap imagery".to_owned()])
        .with_client_name("Acme GmbH")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_created_task_starts_pending(harness: Harness) {
    let client = approved_user("Carla", Role::Client);

    let task = harness
        .service
        .create_task(&client, new_task_request())
        .await
        .expect("creation succeeds");

    assert_eq!(task.status(), TaskStatus::Requested);
    let metas = harness.metas.load().await.expect("metas readable");
    let meta = metas.get(&task.id()).expect("meta created");
    assert_eq!(meta.approval_status(), ApprovalStatus::Pending);
    assert_eq!(meta.owner_user_id(), Some(client.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_created_task_starts_approved(harness: Harness) {
    let admin = approved_user("Ann", Role::Admin);

    let task = harness
        .service
        .create_task(&admin, new_task_request())
        .await
        .expect("creation succeeds");

    let metas = harness.metas.load().await.expect("metas readable");
    let meta = metas.get(&task.id()).expect("meta created");
    assert_eq!(meta.approval_status(), ApprovalStatus::Approved);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unapproved_accounts_cannot_create_tasks(harness: Harness) {
    let pending = pending_user("Newbie");

    let result = harness.service.create_task(&pending, new_task_request()).await;

    assert!(matches!(
        result,
        Err(WorkflowServiceError::Access(AccessError::AccessDenied { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clients_see_only_their_own_tasks(harness: Harness) {
    let carla = approved_user("Carla", Role::Client);
    let dana = approved_user("Dana", Role::Client);
    let admin = approved_user("Ann", Role::Admin);

    let carla_task = harness
        .service
        .create_task(&carla, new_task_request())
        .await
        .expect("creation succeeds");
    harness
        .service
        .create_task(&dana, NewTaskRequest::new("Add cookie banner", date(2025, 2, 1)))
        .await
        .expect("creation succeeds");

    let carla_sees = harness
        .service
        .list_visible(&carla)
        .await
        .expect("listing succeeds");
    assert_eq!(carla_sees.len(), 1);
    assert_eq!(
        carla_sees.first().map(ProjectTask::id),
        Some(carla_task.id())
    );

    let admin_sees = harness
        .service
        .list_visible(&admin)
        .await
        .expect("listing succeeds");
    assert_eq!(admin_sees.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_transition_auto_approves(harness: Harness) {
    let admin = approved_user("Ann", Role::Admin);
    let task = harness
        .service
        .create_task(&admin, new_task_request())
        .await
        .expect("creation succeeds");

    let moved = harness
        .service
        .request_transition(
            &admin,
            TransitionRequest::new(task.id(), TaskStatus::ClientReview)
                .with_status_date(date(2025, 1, 3)),
        )
        .await
        .expect("transition succeeds");

    assert_eq!(moved.status(), TaskStatus::ClientReview);
    let metas = harness.metas.load().await.expect("metas readable");
    let meta = metas.get(&task.id()).expect("meta present");
    assert_eq!(meta.approval_status(), ApprovalStatus::Approved);
    assert_eq!(meta.decision_note(), Some(MANAGER_EDIT_NOTE));
    assert_eq!(meta.decided_by_user_id(), Some(admin.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_transition_resets_approval_to_pending(harness: Harness) {
    let owner = approved_user("Carla", Role::Client);
    let super_user = approved_user("Sam", Role::SuperUser);
    let task = harness
        .service
        .create_task(&owner, new_task_request())
        .await
        .expect("creation succeeds");
    harness
        .service
        .decide_approval(&super_user, task.id(), ApprovalDecision::Approve, None)
        .await
        .expect("decision succeeds");

    harness
        .service
        .request_transition(
            &owner,
            TransitionRequest::new(task.id(), TaskStatus::ClientReview)
                .with_status_date(date(2025, 1, 3)),
        )
        .await
        .expect("transition succeeds");

    let metas = harness.metas.load().await.expect("metas readable");
    let meta = metas.get(&task.id()).expect("meta present");
    assert_eq!(meta.approval_status(), ApprovalStatus::Pending);
    assert_eq!(meta.decided_by_user_id(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clients_cannot_move_other_owners_tasks(harness: Harness) {
    let owner = approved_user("Carla", Role::Client);
    let other = approved_user("Dana", Role::Client);
    let task = harness
        .service
        .create_task(&owner, new_task_request())
        .await
        .expect("creation succeeds");

    let result = harness
        .service
        .request_transition(
            &other,
            TransitionRequest::new(task.id(), TaskStatus::ClientReview)
                .with_status_date(date(2025, 1, 3)),
        )
        .await;

    assert!(matches!(
        result,
        Err(WorkflowServiceError::Access(AccessError::AccessDenied { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn two_step_confirm_flow_through_the_service(harness: Harness) {
    let admin = approved_user("Ann", Role::Admin);
    let task = harness
        .service
        .create_task(&admin, new_task_request())
        .await
        .expect("creation succeeds");
    harness
        .service
        .request_transition(
            &admin,
            TransitionRequest::new(task.id(), TaskStatus::ClientReview)
                .with_status_date(date(2025, 1, 3)),
        )
        .await
        .expect("move to client review");

    // Without an estimate the confirm is rejected outright.
    let missing_estimate = harness
        .service
        .request_transition(
            &admin,
            TransitionRequest::new(task.id(), TaskStatus::Confirmed)
                .with_delivery_date(date(2025, 1, 10)),
        )
        .await;
    assert!(matches!(
        missing_estimate,
        Err(WorkflowServiceError::Domain(WorkflowError::EstimateRequired { .. }))
    ));

    // With an estimate but no delivery date the engine requests one.
    let missing_delivery = harness
        .service
        .request_transition(
            &admin,
            TransitionRequest::new(task.id(), TaskStatus::Confirmed).with_estimated_hours(8.0),
        )
        .await;
    assert!(matches!(
        missing_delivery,
        Err(WorkflowServiceError::Domain(WorkflowError::DeliveryDateRequired))
    ));

    // Supplying the delivery date commits.
    let confirmed = harness
        .service
        .request_transition(
            &admin,
            TransitionRequest::new(task.id(), TaskStatus::Confirmed)
                .with_estimated_hours(8.0)
                .with_delivery_date(date(2025, 1, 10)),
        )
        .await
        .expect("confirm succeeds");

    assert_eq!(confirmed.status(), TaskStatus::Confirmed);
    assert_eq!(confirmed.milestones().delivery, Some(date(2025, 1, 10)));
    assert_eq!(confirmed.history().len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_descriptive_edit_is_allowed_and_resets_approval(harness: Harness) {
    let owner = approved_user("Carla", Role::Client);
    let task = harness
        .service
        .create_task(&owner, new_task_request())
        .await
        .expect("creation succeeds");

    let edited = harness
        .service
        .edit_task(
            &owner,
            EditTaskRequest::new(task.id())
                .with_title("Update hero banner and nav")
                .with_client_name(Some("Acme Holding".to_owned())),
        )
        .await
        .expect("edit succeeds");

    assert_eq!(edited.title().as_str(), "Update hero banner and nav");
    let metas = harness.metas.load().await.expect("metas readable");
    assert_eq!(
        metas.get(&task.id()).map(|meta| meta.approval_status()),
        Some(ApprovalStatus::Pending)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_workflow_edit_is_denied(harness: Harness) {
    let owner = approved_user("Carla", Role::Client);
    let task = harness
        .service
        .create_task(&owner, new_task_request())
        .await
        .expect("creation succeeds");

    let result = harness
        .service
        .edit_task(
            &owner,
            EditTaskRequest::new(task.id()).with_estimated_hours(12.0),
        )
        .await;

    assert!(matches!(
        result,
        Err(WorkflowServiceError::Access(AccessError::AccessDenied { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_hours_is_manager_only(harness: Harness) {
    let owner = approved_user("Carla", Role::Client);
    let admin = approved_user("Ann", Role::Admin);
    let task = harness
        .service
        .create_task(&owner, new_task_request())
        .await
        .expect("creation succeeds");

    let denied = harness
        .service
        .update_hours(&owner, UpdateHoursRequest::new(task.id(), 8.0, 2.0))
        .await;
    assert!(matches!(
        denied,
        Err(WorkflowServiceError::Access(AccessError::AccessDenied { .. }))
    ));

    let updated = harness
        .service
        .update_hours(
            &admin,
            UpdateHoursRequest::new(task.id(), 8.0, 2.0)
                .with_hourly_rate(90.0)
                .with_reason("initial sizing"),
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.hour_revisions().len(), 1);
    // Hour updates do not touch the approval gate.
    let metas = harness.metas.load().await.expect("metas readable");
    assert_eq!(
        metas.get(&task.id()).map(|meta| meta.approval_status()),
        Some(ApprovalStatus::Pending)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_hours_rejects_negative_values(harness: Harness) {
    let admin = approved_user("Ann", Role::Admin);
    let task = harness
        .service
        .create_task(&admin, new_task_request())
        .await
        .expect("creation succeeds");

    let result = harness
        .service
        .update_hours(&admin, UpdateHoursRequest::new(task.id(), -1.0, 0.0))
        .await;

    assert!(matches!(
        result,
        Err(WorkflowServiceError::Domain(WorkflowError::InvalidHours(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_rejection_appends_history_entry(harness: Harness) {
    let owner = approved_user("Carla", Role::Client);
    let super_user = approved_user("Sam", Role::SuperUser);
    let task = harness
        .service
        .create_task(&owner, new_task_request())
        .await
        .expect("creation succeeds");

    let meta = harness
        .service
        .decide_approval(
            &super_user,
            task.id(),
            ApprovalDecision::Reject,
            Some("scope unclear".to_owned()),
        )
        .await
        .expect("decision succeeds");

    assert_eq!(meta.approval_status(), ApprovalStatus::Rejected);
    let tasks = harness.tasks.load().await.expect("tasks readable");
    let stored = tasks.first().expect("task present");
    let entry = stored.history().last().expect("rejection entry");
    assert_eq!(entry.note(), Some("Approval rejected: scope unclear"));
    // The workflow state itself is not reverted.
    assert_eq!(stored.status(), TaskStatus::Requested);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_decisions_require_super_user(harness: Harness) {
    let owner = approved_user("Carla", Role::Client);
    let admin = approved_user("Ann", Role::Admin);
    let task = harness
        .service
        .create_task(&owner, new_task_request())
        .await
        .expect("creation succeeds");

    let result = harness
        .service
        .decide_approval(&admin, task.id(), ApprovalDecision::Approve, None)
        .await;

    assert!(matches!(
        result,
        Err(WorkflowServiceError::Access(AccessError::AccessDenied { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_and_meta_together(harness: Harness) {
    let owner = approved_user("Carla", Role::Client);
    let task = harness
        .service
        .create_task(&owner, new_task_request())
        .await
        .expect("creation succeeds");

    harness
        .service
        .delete_task(&owner, task.id())
        .await
        .expect("owner delete succeeds");

    let tasks = harness.tasks.load().await.expect("tasks readable");
    assert!(tasks.is_empty());
    let metas = harness.metas.load().await.expect("metas readable");
    assert!(metas.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_of_unknown_task_is_not_found(harness: Harness) {
    let admin = approved_user("Ann", Role::Admin);

    let result = harness
        .service
        .delete_task(&admin, TaskId::new())
        .await;

    assert!(matches!(
        result,
        Err(WorkflowServiceError::Access(AccessError::NotFound(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_writes_surface_as_conflicts(harness: Harness) {
    let admin = approved_user("Ann", Role::Admin);
    let task = harness
        .service
        .create_task(&admin, new_task_request())
        .await
        .expect("creation succeeds");

    // Another writer slips in a change with an unexpected timestamp.
    let mut racing = task.clone();
    racing.record_note("concurrent edit", &DefaultClock);
    harness
        .tasks
        .upsert(&racing, Some(task.updated_at()))
        .await
        .expect("racing write succeeds");

    let result = harness.tasks.upsert(&task, Some(task.updated_at())).await;

    assert!(matches!(
        result,
        Err(TaskStoreError::Conflict { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn import_replace_is_manager_gated_and_syncs_metas(harness: Harness) {
    let admin = approved_user("Ann", Role::Admin);
    let client = approved_user("Carla", Role::Client);
    let payload = r#"[{"title": "Imported task", "status": "Requested"}]"#;

    let denied = harness.service.import_replace(&client, payload).await;
    assert!(matches!(
        denied,
        Err(WorkflowServiceError::Access(AccessError::AccessDenied { .. }))
    ));

    let imported = harness
        .service
        .import_replace(&admin, payload)
        .await
        .expect("import succeeds");
    assert_eq!(imported.len(), 1);

    let metas = harness.metas.load().await.expect("metas readable");
    let task_id = imported.first().expect("imported task").id();
    let meta = metas.get(&task_id).expect("meta synthesized");
    assert_eq!(meta.owner_user_id(), Some(admin.id()));
    assert_eq!(meta.approval_status(), ApprovalStatus::Approved);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn export_visible_round_trips_through_import(harness: Harness) {
    let admin = approved_user("Ann", Role::Admin);
    harness
        .service
        .create_task(&admin, new_task_request())
        .await
        .expect("creation succeeds");

    let payload = harness
        .service
        .export_visible(&admin)
        .await
        .expect("export succeeds");
    let imported = harness
        .service
        .import_replace(&admin, &payload)
        .await
        .expect("import succeeds");

    assert_eq!(imported.len(), 1);
}
