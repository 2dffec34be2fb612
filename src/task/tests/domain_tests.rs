//! Domain-focused tests for task normalization and derived fields.

use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use crate::task::domain::{
    NewTask, Task, TaskChanges, TaskDomainError, TaskPriority, TaskStatus,
};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn make_task(clock: &DefaultClock) -> Task {
    Task::create(
        NewTask::new("Exporter les comptes", ProjectId::new()),
        UserId::new(),
        clock,
    )
    .expect("valid task")
}

#[rstest]
fn create_defaults_to_todo_medium_and_no_completion(clock: DefaultClock) {
    let task = make_task(&clock);

    assert_eq!(task.status(), TaskStatus::Todo);
    assert_eq!(task.priority(), TaskPriority::Medium);
    assert_eq!(task.completed_at(), None);
    assert_eq!(task.estimate_minutes(), None);
}

#[rstest]
fn create_falls_back_to_the_creating_actor_as_assignee(clock: DefaultClock) {
    let creator = UserId::new();
    let task = Task::create(
        NewTask::new("Exporter les comptes", ProjectId::new()),
        creator,
        &clock,
    )
    .expect("valid task");

    assert_eq!(task.assignee(), creator);
}

#[rstest]
fn create_keeps_an_explicit_assignee(clock: DefaultClock) {
    let explicit = UserId::new();
    let task = Task::create(
        NewTask::new("Exporter les comptes", ProjectId::new()).with_assignee(explicit),
        UserId::new(),
        &clock,
    )
    .expect("valid task");

    assert_eq!(task.assignee(), explicit);
}

#[rstest]
fn creating_a_completed_task_stamps_the_completion_time(clock: DefaultClock) {
    let task = Task::create(
        NewTask::new("Exporter les comptes", ProjectId::new())
            .with_status(TaskStatus::Completed),
        UserId::new(),
        &clock,
    )
    .expect("valid task");

    assert_eq!(task.completed_at(), Some(task.created_at()));
}

#[rstest]
fn create_rejects_blank_titles(clock: DefaultClock) {
    let result = Task::create(
        NewTask::new("   ", ProjectId::new()),
        UserId::new(),
        &clock,
    );
    assert_eq!(result, Err(TaskDomainError::EmptyTitle));
}

#[rstest]
fn create_rejects_a_due_date_before_the_start_date(clock: DefaultClock) {
    let result = Task::create(
        NewTask::new("Exporter", ProjectId::new())
            .with_start_date(date(2026, 4, 10))
            .with_due_date(date(2026, 4, 1)),
        UserId::new(),
        &clock,
    );
    assert_eq!(
        result,
        Err(TaskDomainError::DueBeforeStart {
            start: date(2026, 4, 10),
            due: date(2026, 4, 1),
        })
    );
}

#[rstest]
fn supplying_both_estimate_fields_is_rejected(clock: DefaultClock) {
    let result = Task::create(
        NewTask::new("Exporter", ProjectId::new())
            .with_estimate_minutes(90)
            .with_estimated_hours(1.5),
        UserId::new(),
        &clock,
    );
    assert_eq!(result, Err(TaskDomainError::EstimateConflict));
}

#[rstest]
#[case(2.0, 120)]
#[case(1.5, 90)]
#[case(0.25, 15)]
#[case(0.0, 0)]
fn hour_estimates_convert_to_minutes(
    #[case] hours: f64,
    #[case] expected_minutes: u32,
    clock: DefaultClock,
) {
    let task = Task::create(
        NewTask::new("Exporter", ProjectId::new()).with_estimated_hours(hours),
        UserId::new(),
        &clock,
    )
    .expect("valid task");

    assert_eq!(task.estimate_minutes(), Some(expected_minutes));
}

#[rstest]
#[case(-1.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn invalid_hour_estimates_are_rejected(#[case] hours: f64, clock: DefaultClock) {
    let result = Task::create(
        NewTask::new("Exporter", ProjectId::new()).with_estimated_hours(hours),
        UserId::new(),
        &clock,
    );
    assert!(matches!(result, Err(TaskDomainError::InvalidEstimatedHours(_))));
}

#[rstest]
fn completing_a_task_stamps_the_completion_time(clock: DefaultClock) {
    let mut task = make_task(&clock);

    let changes = TaskChanges {
        status: Some(TaskStatus::Completed),
        ..TaskChanges::default()
    };
    task.apply(&changes, &clock).expect("valid update");

    assert_eq!(task.status(), TaskStatus::Completed);
    assert!(task.completed_at().is_some());
}

#[rstest]
fn repeated_completion_keeps_the_original_stamp(clock: DefaultClock) {
    let mut task = make_task(&clock);
    let complete = TaskChanges {
        status: Some(TaskStatus::Completed),
        ..TaskChanges::default()
    };
    task.apply(&complete, &clock).expect("valid update");
    let first_stamp = task.completed_at();

    let touch = TaskChanges {
        priority: Some(TaskPriority::High),
        ..TaskChanges::default()
    };
    task.apply(&touch, &clock).expect("valid update");

    assert_eq!(task.completed_at(), first_stamp);
}

#[rstest]
fn leaving_the_completed_status_clears_the_stamp(clock: DefaultClock) {
    let mut task = make_task(&clock);
    let complete = TaskChanges {
        status: Some(TaskStatus::Completed),
        ..TaskChanges::default()
    };
    task.apply(&complete, &clock).expect("valid update");

    let reopen = TaskChanges {
        status: Some(TaskStatus::InProgress),
        ..TaskChanges::default()
    };
    task.apply(&reopen, &clock).expect("valid update");

    assert_eq!(task.completed_at(), None);
}

#[rstest]
fn apply_converts_hour_estimates_like_creation_does(clock: DefaultClock) {
    let mut task = make_task(&clock);

    let changes = TaskChanges {
        estimated_hours: Some(2.0),
        ..TaskChanges::default()
    };
    task.apply(&changes, &clock).expect("valid update");

    assert_eq!(task.estimate_minutes(), Some(120));
}

#[rstest]
fn apply_rejects_conflicting_estimates_without_mutating(clock: DefaultClock) {
    let mut task = make_task(&clock);

    let changes = TaskChanges {
        estimate_minutes: Some(30),
        estimated_hours: Some(4.0),
        ..TaskChanges::default()
    };
    let result = task.apply(&changes, &clock);

    assert_eq!(result, Err(TaskDomainError::EstimateConflict));
    assert_eq!(task.estimate_minutes(), None);
}

#[rstest]
fn apply_validates_dates_against_the_existing_record(clock: DefaultClock) {
    let mut task = Task::create(
        NewTask::new("Exporter", ProjectId::new()).with_start_date(date(2026, 4, 10)),
        UserId::new(),
        &clock,
    )
    .expect("valid task");

    let changes = TaskChanges {
        due_date: Some(date(2026, 4, 1)),
        ..TaskChanges::default()
    };
    let result = task.apply(&changes, &clock);

    assert!(matches!(result, Err(TaskDomainError::DueBeforeStart { .. })));
    assert_eq!(task.due_date(), None);
}

#[rstest]
fn offending_fields_name_the_payload_fields() {
    assert_eq!(
        TaskDomainError::EstimateConflict.offending_fields(),
        ["estimated_hours", "estimate_minutes"]
    );
    assert_eq!(
        TaskDomainError::EmptyTitle.offending_fields(),
        ["title"]
    );
}
