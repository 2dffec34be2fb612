//! Scheduled sweeps that surface due-soon tasks and at-risk projects.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;

use crate::identity::domain::{UserId, UserRole};
use crate::identity::ports::{UserRepository, UserRepositoryError};
use crate::notification::domain::{NotificationEvent, ProjectSummary, TaskSummary};
use crate::notification::ports::NotificationChannel;
use crate::notification::services::NotificationDispatcher;
use crate::project::domain::RISK_THRESHOLD;
use crate::project::ports::{ProjectRepository, ProjectRepositoryError};
use crate::task::ports::{TaskRepository, TaskRepositoryError};

/// Reminder window, in days, when the caller does not supply one.
pub const DEFAULT_DUE_SOON_DAYS: u32 = 3;

/// Outcome of one sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Number of qualifying subjects (tasks or projects) examined.
    pub subjects: usize,
    /// Number of notifications successfully delivered.
    pub notified: usize,
}

/// Errors returned by sweep runs.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Project lookup failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),

    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// User lookup failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

/// Sweep that reminds assignees about tasks due within a rolling window.
///
/// Sweeps are level-triggered: a task still inside the window on the next
/// run is notified again.
#[derive(Clone)]
pub struct DueSoonSweep<T, P, U, N, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    N: NotificationChannel,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    users: Arc<U>,
    dispatcher: NotificationDispatcher<N>,
    clock: Arc<C>,
    days: u32,
}

impl<T, P, U, N, C> DueSoonSweep<T, P, U, N, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    N: NotificationChannel,
    C: Clock + Send + Sync,
{
    /// Creates a sweep with the default reminder window.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        projects: Arc<P>,
        users: Arc<U>,
        dispatcher: NotificationDispatcher<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            projects,
            users,
            dispatcher,
            clock,
            days: DEFAULT_DUE_SOON_DAYS,
        }
    }

    /// Overrides the reminder window.
    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    /// Runs one sweep: finds open tasks due within the window and sends a
    /// reminder to the primary assignee and every additionally assigned
    /// user.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when a repository lookup fails. Delivery
    /// failures do not abort the run.
    pub async fn run(&self) -> Result<SweepReport, SweepError> {
        let today = self.clock.utc().date_naive();
        let due = self.tasks.find_due_within(today, self.days).await?;
        let mut report = SweepReport {
            subjects: due.len(),
            notified: 0,
        };
        for task in &due {
            let project_name = self
                .projects
                .find_by_id(task.project_id())
                .await?
                .map(|project| project.name().to_owned());
            let mut ids: Vec<UserId> = vec![task.assignee()];
            ids.extend(task.assigned_users().iter().copied());
            let recipients = self.users.find_by_ids(&ids).await?;
            let event = NotificationEvent::TaskDueSoon {
                task: TaskSummary::capture(task, project_name.as_deref()),
            };
            report.notified += self.dispatcher.dispatch(&event, &recipients).await;
        }
        Ok(report)
    }
}

/// Sweep that alerts admins and project members about projects whose risk
/// score sits above the threshold.
///
/// Level-triggered like [`DueSoonSweep`]: a project still above the
/// threshold on the next run is notified again.
#[derive(Clone)]
pub struct AtRiskSweep<P, U, N>
where
    P: ProjectRepository,
    U: UserRepository,
    N: NotificationChannel,
{
    projects: Arc<P>,
    users: Arc<U>,
    dispatcher: NotificationDispatcher<N>,
    threshold: f64,
}

impl<P, U, N> AtRiskSweep<P, U, N>
where
    P: ProjectRepository,
    U: UserRepository,
    N: NotificationChannel,
{
    /// Creates a sweep with the default risk threshold.
    #[must_use]
    pub const fn new(
        projects: Arc<P>,
        users: Arc<U>,
        dispatcher: NotificationDispatcher<N>,
    ) -> Self {
        Self {
            projects,
            users,
            dispatcher,
            threshold: RISK_THRESHOLD,
        }
    }

    /// Overrides the risk threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Runs one sweep: finds active projects above the threshold and
    /// alerts every admin plus the project's assigned users.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when a repository lookup fails. Delivery
    /// failures do not abort the run.
    pub async fn run(&self) -> Result<SweepReport, SweepError> {
        let at_risk = self.projects.find_at_risk(self.threshold).await?;
        let mut report = SweepReport {
            subjects: at_risk.len(),
            notified: 0,
        };
        if at_risk.is_empty() {
            return Ok(report);
        }
        let admins = self.users.list_by_role(UserRole::Admin).await?;
        for project in &at_risk {
            let ids: Vec<UserId> = project.assigned_users().iter().copied().collect();
            let mut recipients = self.users.find_by_ids(&ids).await?;
            recipients.extend(admins.iter().cloned());
            let event = NotificationEvent::ProjectAtRisk {
                project: ProjectSummary::from(project),
            };
            report.notified += self.dispatcher.dispatch(&event, &recipients).await;
        }
        Ok(report)
    }
}
