//! Scheduled sweep tests for due-soon reminders and at-risk alerts.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::{NewUser, User, UserId, UserRole},
    ports::UserRepository,
};
use crate::notification::{
    adapters::memory::RecordingChannel,
    domain::EventKind,
    services::{AtRiskSweep, DueSoonSweep, NotificationDispatcher},
};
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{NewProject, Project},
    ports::ProjectRepository,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{NewTask, Task},
    ports::TaskRepository,
};

/// Clock pinned to one instant so window arithmetic is deterministic.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date")
}

fn fixed_clock() -> FixedClock {
    let midday = today().and_hms_opt(12, 0, 0).expect("valid time");
    FixedClock(Utc.from_utc_datetime(&midday))
}

struct Harness {
    tasks: Arc<InMemoryTaskRepository>,
    projects: Arc<InMemoryProjectRepository>,
    users: Arc<InMemoryUserRepository>,
    channel: Arc<RecordingChannel>,
}

impl Harness {
    fn dispatcher(&self) -> NotificationDispatcher<RecordingChannel> {
        NotificationDispatcher::new(Arc::clone(&self.channel))
    }

    fn due_soon_sweep(
        &self,
    ) -> DueSoonSweep<
        InMemoryTaskRepository,
        InMemoryProjectRepository,
        InMemoryUserRepository,
        RecordingChannel,
        FixedClock,
    > {
        DueSoonSweep::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.projects),
            Arc::clone(&self.users),
            self.dispatcher(),
            Arc::new(fixed_clock()),
        )
    }

    fn at_risk_sweep(
        &self,
    ) -> AtRiskSweep<InMemoryProjectRepository, InMemoryUserRepository, RecordingChannel> {
        AtRiskSweep::new(
            Arc::clone(&self.projects),
            Arc::clone(&self.users),
            self.dispatcher(),
        )
    }

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

    async fn seed_project(&self, payload: NewProject, assigned: &[UserId]) -> Project {
        let mut project =
            Project::create(payload, UserId::new(), &DefaultClock).expect("valid project");
        let requested: BTreeSet<UserId> = assigned.iter().copied().collect();
        project.attach_users(&requested, &DefaultClock);
        self.projects
            .store(&project)
            .await
            .expect("store should succeed");
        project
    }

    async fn seed_due_task(
        &self,
        project: &Project,
        due: NaiveDate,
        assignee: UserId,
        assigned: &[UserId],
    ) -> Task {
        let task = Task::create(
            NewTask::new("Exporter les comptes", project.id())
                .with_due_date(due)
                .with_assignee(assignee)
                .with_assigned_users(assigned.iter().copied()),
            assignee,
            &DefaultClock,
        )
        .expect("valid task");
        self.tasks.store(&task).await.expect("store should succeed");
        task
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        tasks: Arc::new(InMemoryTaskRepository::new()),
        projects: Arc::new(InMemoryProjectRepository::new()),
        users: Arc::new(InMemoryUserRepository::new()),
        channel: Arc::new(RecordingChannel::new()),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_soon_reminds_the_assignee_and_the_assigned_set(harness: Harness) {
    let assignee = harness.register("Claire Fontaine", UserRole::Member).await;
    let helper = harness.register("Bruno Leroy", UserRole::Member).await;
    let project = harness
        .seed_project(NewProject::new("Refonte du portail"), &[])
        .await;
    harness
        .seed_due_task(&project, date(2026, 3, 12), assignee.id(), &[helper.id()])
        .await;

    let report = harness.due_soon_sweep().run().await.expect("sweep should succeed");

    assert_eq!(report.subjects, 1);
    assert_eq!(report.notified, 2);
    for user in [&assignee, &helper] {
        let deliveries = harness.channel.deliveries_to(user.id());
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].kind, EventKind::TaskDueSoon);
        assert!(deliveries[0].body.contains("Refonte du portail"));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_soon_ignores_tasks_outside_the_window(harness: Harness) {
    let assignee = harness.register("Claire Fontaine", UserRole::Member).await;
    let project = harness
        .seed_project(NewProject::new("Refonte"), &[])
        .await;
    harness
        .seed_due_task(&project, date(2026, 3, 20), assignee.id(), &[])
        .await;

    let report = harness.due_soon_sweep().run().await.expect("sweep should succeed");

    assert_eq!(report.subjects, 0);
    assert_eq!(report.notified, 0);
    assert!(harness.channel.deliveries().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_soon_honours_a_widened_window(harness: Harness) {
    let assignee = harness.register("Claire Fontaine", UserRole::Member).await;
    let project = harness
        .seed_project(NewProject::new("Refonte"), &[])
        .await;
    harness
        .seed_due_task(&project, date(2026, 3, 17), assignee.id(), &[])
        .await;

    let report = harness
        .due_soon_sweep()
        .with_days(7)
        .run()
        .await
        .expect("sweep should succeed");

    assert_eq!(report.subjects, 1);
    assert_eq!(report.notified, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_soon_runs_are_level_triggered(harness: Harness) {
    let assignee = harness.register("Claire Fontaine", UserRole::Member).await;
    let project = harness
        .seed_project(NewProject::new("Refonte"), &[])
        .await;
    harness
        .seed_due_task(&project, date(2026, 3, 12), assignee.id(), &[])
        .await;

    let sweep = harness.due_soon_sweep();
    sweep.run().await.expect("first run should succeed");
    sweep.run().await.expect("second run should succeed");

    assert_eq!(harness.channel.deliveries_to(assignee.id()).len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn at_risk_alerts_admins_and_assigned_users(harness: Harness) {
    let admin = harness.register("Alice Martin", UserRole::Admin).await;
    let assigned = harness.register("Claire Fontaine", UserRole::Member).await;
    let bystander = harness.register("Bruno Leroy", UserRole::Member).await;
    harness
        .seed_project(
            NewProject::new("Projet critique").with_risk_score(85.0),
            &[assigned.id()],
        )
        .await;

    let report = harness.at_risk_sweep().run().await.expect("sweep should succeed");

    assert_eq!(report.subjects, 1);
    assert_eq!(report.notified, 2);
    assert_eq!(harness.channel.deliveries_to(admin.id()).len(), 1);
    assert_eq!(harness.channel.deliveries_to(assigned.id()).len(), 1);
    assert!(harness.channel.deliveries_to(bystander.id()).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn at_risk_ignores_projects_at_or_below_the_threshold(harness: Harness) {
    harness.register("Alice Martin", UserRole::Admin).await;
    harness
        .seed_project(NewProject::new("Projet limite").with_risk_score(70.0), &[])
        .await;
    harness
        .seed_project(NewProject::new("Projet calme").with_risk_score(20.0), &[])
        .await;

    let report = harness.at_risk_sweep().run().await.expect("sweep should succeed");

    assert_eq!(report.subjects, 0);
    assert_eq!(report.notified, 0);
    assert!(harness.channel.deliveries().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn at_risk_honours_a_lowered_threshold(harness: Harness) {
    let admin = harness.register("Alice Martin", UserRole::Admin).await;
    harness
        .seed_project(NewProject::new("Projet moyen").with_risk_score(55.0), &[])
        .await;

    let report = harness
        .at_risk_sweep()
        .with_threshold(50.0)
        .run()
        .await
        .expect("sweep should succeed");

    assert_eq!(report.subjects, 1);
    assert_eq!(harness.channel.deliveries_to(admin.id()).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn at_risk_deduplicates_an_admin_who_is_also_assigned(harness: Harness) {
    let admin = harness.register("Alice Martin", UserRole::Admin).await;
    harness
        .seed_project(
            NewProject::new("Projet critique").with_risk_score(85.0),
            &[admin.id()],
        )
        .await;

    let report = harness.at_risk_sweep().run().await.expect("sweep should succeed");

    assert_eq!(report.notified, 1);
    assert_eq!(harness.channel.deliveries_to(admin.id()).len(), 1);
}
