//! Unit tests for the in-memory task repository adapter.

use crate::identity::domain::UserId;
use crate::paging::PageRequest;
use crate::project::domain::ProjectId;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{NewTask, Task, TaskFilter, TaskScope, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

#[fixture]
fn repo() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn due_task(title: &str, due: NaiveDate) -> Task {
    Task::create(
        NewTask::new(title, ProjectId::new()).with_due_date(due),
        UserId::new(),
        &DefaultClock,
    )
    .expect("valid task")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_tasks_are_retrievable(repo: InMemoryTaskRepository) {
    let task = Task::create(
        NewTask::new("Exporter les comptes", ProjectId::new()),
        UserId::new(),
        &DefaultClock,
    )
    .expect("valid task");
    repo.store(&task).await.expect("store should succeed");

    let found = repo.find_by_id(task.id()).await.expect("lookup should succeed");
    assert_eq!(found, Some(task));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn soft_deleted_tasks_disappear_from_lookups_and_listings(repo: InMemoryTaskRepository) {
    let task = due_task("Exporter", date(2026, 4, 1));
    repo.store(&task).await.expect("store should succeed");
    repo.soft_delete(task.id(), DefaultClock.utc())
        .await
        .expect("delete should succeed");

    assert_eq!(repo.find_by_id(task.id()).await.expect("lookup"), None);
    let page = repo
        .list(
            &TaskScope::Unrestricted,
            &TaskFilter::new(),
            PageRequest::default(),
        )
        .await
        .expect("listing should succeed");
    assert_eq!(page.total, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_an_unknown_task_reports_not_found(repo: InMemoryTaskRepository) {
    let ghost = due_task("Fantôme", date(2026, 4, 1));
    let result = repo.update(&ghost).await;
    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == ghost.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_window_lookup_includes_both_boundaries(repo: InMemoryTaskRepository) {
    let today = date(2026, 3, 10);
    let due_today = due_task("Aujourd'hui", today);
    let due_at_horizon = due_task("Au bord", date(2026, 3, 13));
    let due_later = due_task("Plus tard", date(2026, 3, 14));
    let overdue = due_task("En retard", date(2026, 3, 9));

    for task in [&due_today, &due_at_horizon, &due_later, &overdue] {
        repo.store(task).await.expect("store should succeed");
    }

    let due = repo
        .find_due_within(today, 3)
        .await
        .expect("lookup should succeed");
    let titles: Vec<&str> = due.iter().map(Task::title).collect();

    assert!(titles.contains(&"Aujourd'hui"));
    assert!(titles.contains(&"Au bord"));
    assert!(!titles.contains(&"Plus tard"));
    assert!(!titles.contains(&"En retard"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_window_lookup_skips_completed_tasks(repo: InMemoryTaskRepository) {
    let today = date(2026, 3, 10);
    let finished = Task::create(
        NewTask::new("Déjà terminé", ProjectId::new())
            .with_due_date(date(2026, 3, 11))
            .with_status(TaskStatus::Completed),
        UserId::new(),
        &DefaultClock,
    )
    .expect("valid task");
    repo.store(&finished).await.expect("store should succeed");

    let due = repo
        .find_due_within(today, 3)
        .await
        .expect("lookup should succeed");
    assert!(due.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_window_lookup_skips_archived_tasks(repo: InMemoryTaskRepository) {
    let today = date(2026, 3, 10);
    let mut task = due_task("Archivé", date(2026, 3, 11));
    task.archive(&DefaultClock);
    repo.store(&task).await.expect("store should succeed");

    let due = repo
        .find_due_within(today, 3)
        .await
        .expect("lookup should succeed");
    assert!(due.is_empty());
}
