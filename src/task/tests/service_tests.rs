//! Service orchestration tests for task lifecycle and notifications.

use std::collections::BTreeSet;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::{Actor, NewUser, User, UserId, UserRole},
    ports::UserRepository,
};
use crate::notification::{
    adapters::memory::RecordingChannel,
    domain::EventKind,
    services::NotificationDispatcher,
};
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{NewProject, Project, ProjectId},
    ports::ProjectRepository,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{NewTask, TaskChanges, TaskFilter, TaskStatus},
    services::{TaskService, TaskServiceError},
};

type TestService = TaskService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    InMemoryUserRepository,
    RecordingChannel,
    DefaultClock,
>;

struct Harness {
    service: TestService,
    projects: Arc<InMemoryProjectRepository>,
    users: Arc<InMemoryUserRepository>,
    channel: Arc<RecordingChannel>,
}

impl Harness {
    async fn register(&self, name: &str, role: UserRole) -> User {
        let local = name.to_lowercase().replace(' ', ".");
        let user = User::create(
            NewUser::new(name, format!("{local}@exemple.fr"), role),
            &DefaultClock,
        )
        .expect("valid user");
        self.users.store(&user).await.expect("store should succeed");
        user
    }

    async fn seed_project(&self, name: &str, creator: UserId) -> Project {
        let project = Project::create(NewProject::new(name), creator, &DefaultClock)
            .expect("valid project");
        self.projects
            .store(&project)
            .await
            .expect("store should succeed");
        project
    }
}

#[fixture]
fn harness() -> Harness {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let channel = Arc::new(RecordingChannel::new());
    let service = TaskService::new(
        tasks,
        Arc::clone(&projects),
        Arc::clone(&users),
        NotificationDispatcher::new(Arc::clone(&channel)),
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        projects,
        users,
        channel,
    }
}

fn manager() -> Actor {
    Actor::new(UserId::new(), UserRole::Manager)
}

fn set(ids: &[UserId]) -> BTreeSet<UserId> {
    ids.iter().copied().collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn managers_create_tasks_in_existing_projects(harness: Harness) {
    let actor = manager();
    let project = harness.seed_project("Refonte", actor.id()).await;

    let created = harness
        .service
        .create(NewTask::new("Exporter les comptes", project.id()), actor)
        .await
        .expect("creation should succeed");

    assert_eq!(created.project_id(), project.id());
    assert_eq!(created.assignee(), actor.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creating_a_task_in_an_unknown_project_is_rejected(harness: Harness) {
    let orphan = NewTask::new("Sans parent", ProjectId::new());
    let missing = orphan.project_id();
    let result = harness.service.create(orphan, manager()).await;
    assert!(matches!(result, Err(TaskServiceError::ProjectNotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_may_not_create_tasks(harness: Harness) {
    let member = Actor::new(UserId::new(), UserRole::Member);
    let project = harness.seed_project("Refonte", UserId::new()).await;

    let result = harness
        .service
        .create(NewTask::new("Interdit", project.id()), member)
        .await;
    assert!(matches!(result, Err(TaskServiceError::Forbidden(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initial_assignment_notifies_each_assigned_user(harness: Harness) {
    let actor = manager();
    let project = harness.seed_project("Refonte", actor.id()).await;
    let first = harness.register("Claire Fontaine", UserRole::Member).await;
    let second = harness.register("Bruno Leroy", UserRole::Member).await;

    harness
        .service
        .create(
            NewTask::new("Exporter les comptes", project.id())
                .with_assigned_users([first.id(), second.id()]),
            actor,
        )
        .await
        .expect("creation should succeed");

    for user in [&first, &second] {
        let deliveries = harness.channel.deliveries_to(user.id());
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].kind, EventKind::TaskAssigned);
        assert!(deliveries[0].body.contains("Refonte"));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn syncing_assignments_notifies_only_newcomers(harness: Harness) {
    let actor = manager();
    let project = harness.seed_project("Refonte", actor.id()).await;
    let kept = harness.register("Claire Fontaine", UserRole::Member).await;
    let added = harness.register("Bruno Leroy", UserRole::Member).await;

    let created = harness
        .service
        .create(
            NewTask::new("Exporter les comptes", project.id())
                .with_assigned_users([kept.id()]),
            actor,
        )
        .await
        .expect("creation should succeed");

    let changes = TaskChanges {
        assigned_users: Some(set(&[kept.id(), added.id()])),
        ..TaskChanges::default()
    };
    let updated = harness
        .service
        .update(created.id(), &changes, actor)
        .await
        .expect("update should succeed");

    assert_eq!(updated.assigned_users(), &set(&[kept.id(), added.id()]));
    assert_eq!(harness.channel.deliveries_to(kept.id()).len(), 1);
    assert_eq!(harness.channel.deliveries_to(added.id()).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignees_update_their_own_tasks(harness: Harness) {
    let actor = manager();
    let project = harness.seed_project("Refonte", actor.id()).await;
    let assignee = harness.register("Claire Fontaine", UserRole::Member).await;

    let created = harness
        .service
        .create(
            NewTask::new("Exporter les comptes", project.id()).with_assignee(assignee.id()),
            actor,
        )
        .await
        .expect("creation should succeed");

    let changes = TaskChanges {
        status: Some(TaskStatus::InProgress),
        ..TaskChanges::default()
    };
    let updated = harness
        .service
        .update(created.id(), &changes, assignee.as_actor())
        .await
        .expect("assignee update should succeed");

    assert_eq!(updated.status(), TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uninvolved_members_may_not_view_a_task(harness: Harness) {
    let actor = manager();
    let project = harness.seed_project("Refonte", actor.id()).await;
    let created = harness
        .service
        .create(NewTask::new("Exporter les comptes", project.id()), actor)
        .await
        .expect("creation should succeed");

    let outsider = Actor::new(UserId::new(), UserRole::Member);
    let result = harness.service.get(created.id(), outsider).await;
    assert!(matches!(result, Err(TaskServiceError::Forbidden(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn parent_project_creators_delete_tasks(harness: Harness) {
    let owner = harness.register("Claire Fontaine", UserRole::Member).await;
    let project = harness.seed_project("Refonte", owner.id()).await;
    let created = harness
        .service
        .create(NewTask::new("Exporter les comptes", project.id()), manager())
        .await
        .expect("creation should succeed");

    harness
        .service
        .delete(created.id(), owner.as_actor())
        .await
        .expect("owner deletion should succeed");

    let result = harness.service.get(created.id(), manager()).await;
    assert!(matches!(result, Err(TaskServiceError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn member_listings_cover_tasks_of_their_own_projects(harness: Harness) {
    let member = harness.register("Claire Fontaine", UserRole::Member).await;
    let own_project = harness.seed_project("Projet du membre", member.id()).await;
    let other_project = harness.seed_project("Autre projet", UserId::new()).await;

    let actor = manager();
    harness
        .service
        .create(NewTask::new("Tâche visible", own_project.id()), actor)
        .await
        .expect("creation should succeed");
    harness
        .service
        .create(NewTask::new("Tâche cachée", other_project.id()), actor)
        .await
        .expect("creation should succeed");

    let page = harness
        .service
        .list(&TaskFilter::new(), member.as_actor())
        .await
        .expect("listing should succeed");

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title(), "Tâche visible");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn managers_list_every_task(harness: Harness) {
    let actor = manager();
    let project = harness.seed_project("Refonte", actor.id()).await;
    for title in ["Première", "Deuxième"] {
        harness
            .service
            .create(NewTask::new(title, project.id()), actor)
            .await
            .expect("creation should succeed");
    }

    let page = harness
        .service
        .list(&TaskFilter::new(), manager())
        .await
        .expect("listing should succeed");
    assert_eq!(page.total, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conflicting_estimates_fail_validation_without_storing(harness: Harness) {
    let actor = manager();
    let project = harness.seed_project("Refonte", actor.id()).await;

    let result = harness
        .service
        .create(
            NewTask::new("Exporter", project.id())
                .with_estimate_minutes(30)
                .with_estimated_hours(2.0),
            actor,
        )
        .await;

    assert!(matches!(result, Err(TaskServiceError::Validation(_))));
    let page = harness
        .service
        .list(&TaskFilter::new(), actor)
        .await
        .expect("listing should succeed");
    assert_eq!(page.total, 0);
}
