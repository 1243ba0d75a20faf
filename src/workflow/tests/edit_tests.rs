//! Unit tests for bulk edits from the task-details editor.

use super::fixtures::{approved_task, confirmed_task, date, requested_task};
use crate::workflow::domain::{
    Hours, MilestoneDates, TaskEdit, TaskStatus, WorkflowError,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
fn descriptive_edit_applies_fields_and_appends_history(clock: DefaultClock) {
    let mut task = requested_task(&clock);
    let history_before = task.history().len();

    let edit = TaskEdit {
        title: Some("Update hero banner and footer".to_owned()),
        client_name: Some(Some("Acme Holding".to_owned())),
        requested_date: Some(date(2025, 1, 4)),
        change_points: Some(vec!["Swap imagery".to_owned(), "Footer links".to_owned()]),
        note: Some("client call follow-up".to_owned()),
        ..TaskEdit::default()
    };
    task.apply_edit(&edit, &clock).expect("edit succeeds");

    assert_eq!(task.title().as_str(), "Update hero banner and footer");
    assert_eq!(task.client_name(), Some("Acme Holding"));
    assert_eq!(task.requested_date(), date(2025, 1, 4));
    assert_eq!(task.status(), TaskStatus::Requested);
    assert_eq!(task.history().len(), history_before + 1);
    let entry = task.history().last().expect("edit entry");
    assert_eq!(entry.note(), Some("client call follow-up"));
}

#[rstest]
fn descriptive_only_detection_matches_field_usage() {
    let descriptive = TaskEdit {
        title: Some("New title".to_owned()),
        client_name: Some(None),
        ..TaskEdit::default()
    };
    assert!(descriptive.is_descriptive_only());

    let with_status = TaskEdit {
        status: Some(TaskStatus::Confirmed),
        ..TaskEdit::default()
    };
    assert!(!with_status.is_descriptive_only());

    let with_hours = TaskEdit {
        estimated_hours: Some(Hours::ZERO),
        ..TaskEdit::default()
    };
    assert!(!with_hours.is_descriptive_only());

    let with_date = TaskEdit {
        milestone_dates: MilestoneDates {
            delivery: Some(date(2025, 1, 10)),
            ..MilestoneDates::default()
        },
        ..TaskEdit::default()
    };
    assert!(!with_date.is_descriptive_only());
}

#[rstest]
fn edit_status_change_requires_target_milestone_date(clock: DefaultClock) {
    let mut task = requested_task(&clock);

    let edit = TaskEdit {
        status: Some(TaskStatus::ClientReview),
        ..TaskEdit::default()
    };
    let result = task.apply_edit(&edit, &clock);

    assert_eq!(
        result.err(),
        Some(WorkflowError::StatusDateRequired {
            status: TaskStatus::ClientReview,
        })
    );
}

#[rstest]
fn edit_status_change_uses_the_per_status_date_field(clock: DefaultClock) {
    let mut task = requested_task(&clock);

    let edit = TaskEdit {
        status: Some(TaskStatus::ClientReview),
        milestone_dates: MilestoneDates {
            client_review: Some(date(2025, 1, 3)),
            ..MilestoneDates::default()
        },
        ..TaskEdit::default()
    };
    task.apply_edit(&edit, &clock).expect("edit succeeds");

    assert_eq!(task.status(), TaskStatus::ClientReview);
    assert_eq!(task.milestones().client_review, Some(date(2025, 1, 3)));
}

#[rstest]
fn edit_confirmation_requires_delivery_date_and_estimate(clock: DefaultClock) {
    let mut task = requested_task(&clock);
    task.apply_edit(
        &TaskEdit {
            status: Some(TaskStatus::ClientReview),
            milestone_dates: MilestoneDates {
                client_review: Some(date(2025, 1, 3)),
                ..MilestoneDates::default()
            },
            ..TaskEdit::default()
        },
        &clock,
    )
    .expect("move to client review");

    let no_estimate = TaskEdit {
        status: Some(TaskStatus::Confirmed),
        milestone_dates: MilestoneDates {
            delivery: Some(date(2025, 1, 10)),
            ..MilestoneDates::default()
        },
        ..TaskEdit::default()
    };
    assert_eq!(
        task.apply_edit(&no_estimate, &clock).err(),
        Some(WorkflowError::EstimateRequired {
            status: TaskStatus::Confirmed,
        })
    );

    let no_delivery = TaskEdit {
        status: Some(TaskStatus::Confirmed),
        estimated_hours: Some(Hours::new(8.0).expect("valid hours")),
        ..TaskEdit::default()
    };
    assert_eq!(
        task.apply_edit(&no_delivery, &clock).err(),
        Some(WorkflowError::DeliveryDateRequired)
    );

    let complete = TaskEdit {
        status: Some(TaskStatus::Confirmed),
        estimated_hours: Some(Hours::new(8.0).expect("valid hours")),
        milestone_dates: MilestoneDates {
            delivery: Some(date(2025, 1, 10)),
            ..MilestoneDates::default()
        },
        ..TaskEdit::default()
    };
    task.apply_edit(&complete, &clock).expect("confirm succeeds");
    assert_eq!(task.status(), TaskStatus::Confirmed);
    assert_eq!(task.milestones().delivery, Some(date(2025, 1, 10)));
}

#[rstest]
fn edit_rollback_requires_note_and_clears_milestones(clock: DefaultClock) {
    let mut task = approved_task(&clock, 5.0);

    let without_note = TaskEdit {
        status: Some(TaskStatus::ClientReview),
        milestone_dates: MilestoneDates {
            client_review: Some(date(2025, 1, 20)),
            ..MilestoneDates::default()
        },
        ..TaskEdit::default()
    };
    assert_eq!(
        task.apply_edit(&without_note, &clock).err(),
        Some(WorkflowError::RollbackReasonRequired)
    );

    let with_note = TaskEdit {
        status: Some(TaskStatus::ClientReview),
        milestone_dates: MilestoneDates {
            client_review: Some(date(2025, 1, 20)),
            ..MilestoneDates::default()
        },
        note: Some("scope changed".to_owned()),
        ..TaskEdit::default()
    };
    task.apply_edit(&with_note, &clock).expect("rollback succeeds");

    assert_eq!(task.status(), TaskStatus::ClientReview);
    assert_eq!(task.estimated_hours(), Hours::ZERO);
    assert_eq!(task.milestones().delivery, None);
    assert_eq!(task.milestones().approved, None);
    let revision = task.hour_revisions().last().expect("rollback revision");
    assert_eq!(revision.reason(), Some("scope changed"));
}

#[rstest]
fn edit_estimate_change_appends_revision_with_edit_reason(clock: DefaultClock) {
    let mut task = confirmed_task(&clock, 8.0);
    let revisions_before = task.hour_revisions().len();

    let edit = TaskEdit {
        estimated_hours: Some(Hours::new(12.0).expect("valid hours")),
        ..TaskEdit::default()
    };
    task.apply_edit(&edit, &clock).expect("edit succeeds");

    assert_eq!(task.hour_revisions().len(), revisions_before + 1);
    let revision = task.hour_revisions().last().expect("edit revision");
    assert_eq!(revision.reason(), Some("Details updated"));
}

#[rstest]
fn edit_rejects_blank_replacement_title(clock: DefaultClock) {
    let mut task = requested_task(&clock);
    let before = task.clone();

    let edit = TaskEdit {
        title: Some("   ".to_owned()),
        ..TaskEdit::default()
    };

    assert_eq!(task.apply_edit(&edit, &clock).err(), Some(WorkflowError::EmptyTitle));
    assert_eq!(task, before);
}

#[rstest]
fn edit_rejects_illegal_status_jump_without_mutating(clock: DefaultClock) {
    let mut task = requested_task(&clock);
    let before = task.clone();

    let edit = TaskEdit {
        title: Some("Should not stick".to_owned()),
        status: Some(TaskStatus::Handover),
        milestone_dates: MilestoneDates {
            handover: Some(date(2025, 3, 1)),
            ..MilestoneDates::default()
        },
        ..TaskEdit::default()
    };

    assert_eq!(
        task.apply_edit(&edit, &clock).err(),
        Some(WorkflowError::InvalidTransition {
            from: TaskStatus::Requested,
            to: TaskStatus::Handover,
        })
    );
    assert_eq!(task, before);
}
