//! Task orchestration: authorize, normalize, mutate, then dispatch.

use std::collections::BTreeSet;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;

use crate::access::{Action, AccessDenied, ResourceKind, TaskAccess, task_decision};
use crate::identity::domain::{Actor, User, UserId};
use crate::identity::ports::UserRepository;
use crate::notification::domain::{NotificationEvent, TaskSummary};
use crate::notification::ports::NotificationChannel;
use crate::notification::services::NotificationDispatcher;
use crate::paging::{PageOf, PageRequest};
use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    domain::{NewTask, Task, TaskChanges, TaskDomainError, TaskFilter, TaskId, TaskScope},
    ports::{TaskRepository, TaskRepositoryError},
};

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The policy engine denied the action.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// A business invariant beyond shape validation was violated.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// The task does not exist or is not visible.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The parent project does not exist or is not visible.
    #[error("parent project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Project repository operation failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task lifecycle orchestration service.
///
/// Authorization for single-task actions needs the parent project, so the
/// service resolves it before consulting the policy engine. As everywhere,
/// authorization precedes mutation and mutation precedes dispatch.
#[derive(Clone)]
pub struct TaskService<T, P, U, N, C>
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
}

impl<T, P, U, N, C> TaskService<T, P, U, N, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    N: NotificationChannel,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
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
        }
    }

    /// Lists the tasks the actor may see, filtered and paginated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Projects`] or [`TaskServiceError::Tasks`]
    /// on persistence failure.
    pub async fn list(
        &self,
        filter: &TaskFilter,
        actor: Actor,
    ) -> TaskServiceResult<PageOf<Task>> {
        task_decision(actor, Action::ViewAny, None)
            .require(ResourceKind::Task, Action::ViewAny)?;
        let involved = if actor.is_member() {
            self.projects.list_ids_involving(actor.id()).await?
        } else {
            BTreeSet::new()
        };
        let scope = TaskScope::for_actor(actor, involved);
        let page = PageRequest::new(filter.page, filter.per_page);
        Ok(self.tasks.list(&scope, filter, page).await?)
    }

    /// Retrieves one task the actor may view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown tasks and
    /// [`TaskServiceError::Forbidden`] when viewing is denied.
    pub async fn get(&self, id: TaskId, actor: Actor) -> TaskServiceResult<Task> {
        let task = self.load(id).await?;
        let parent = self.load_parent(&task).await?;
        task_decision(actor, Action::View, Some(TaskAccess::new(&task, &parent)))
            .require(ResourceKind::Task, Action::View)?;
        Ok(task)
    }

    /// Creates a task with normalized payload fields. When the payload
    /// omits a primary assignee, the creating actor becomes it. Users in
    /// the initial assignment set are notified of their assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-managers,
    /// [`TaskServiceError::ProjectNotFound`] for an unknown parent,
    /// [`TaskServiceError::Validation`] on invalid payloads (including
    /// supplying both estimate fields), or [`TaskServiceError::Tasks`] on
    /// persistence failure.
    pub async fn create(&self, payload: NewTask, actor: Actor) -> TaskServiceResult<Task> {
        task_decision(actor, Action::Create, None)
            .require(ResourceKind::Task, Action::Create)?;
        let parent = self
            .projects
            .find_by_id(payload.project_id())
            .await?
            .ok_or(TaskServiceError::ProjectNotFound(payload.project_id()))?;
        let task = Task::create(payload, actor.id(), &*self.clock)?;
        self.tasks.store(&task).await?;
        let initial: BTreeSet<UserId> = task.assigned_users().clone();
        self.notify_assigned(&task, &parent, &initial).await;
        Ok(task)
    }

    /// Applies a partial update with payload normalization. When the
    /// changes carry an assignment set, it replaces the current one and
    /// only users newly present after the diff are notified.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`],
    /// [`TaskServiceError::ProjectNotFound`],
    /// [`TaskServiceError::Forbidden`], [`TaskServiceError::Validation`],
    /// or [`TaskServiceError::Tasks`]. No partial mutation occurs on any
    /// of these.
    pub async fn update(
        &self,
        id: TaskId,
        changes: &TaskChanges,
        actor: Actor,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load(id).await?;
        let parent = self.load_parent(&task).await?;
        task_decision(actor, Action::Update, Some(TaskAccess::new(&task, &parent)))
            .require(ResourceKind::Task, Action::Update)?;
        task.apply(changes, &*self.clock)?;
        let newly_added = changes
            .assigned_users
            .as_ref()
            .map_or_else(BTreeSet::new, |requested| {
                task.replace_users(requested, &*self.clock)
            });
        self.tasks.update(&task).await?;
        self.notify_assigned(&task, &parent, &newly_added).await;
        Ok(task)
    }

    /// Soft-deletes a task; the record is retained for audit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`],
    /// [`TaskServiceError::ProjectNotFound`],
    /// [`TaskServiceError::Forbidden`], or [`TaskServiceError::Tasks`].
    pub async fn delete(&self, id: TaskId, actor: Actor) -> TaskServiceResult<()> {
        let task = self.load(id).await?;
        let parent = self.load_parent(&task).await?;
        task_decision(actor, Action::Delete, Some(TaskAccess::new(&task, &parent)))
            .require(ResourceKind::Task, Action::Delete)?;
        self.tasks.soft_delete(id, self.clock.utc()).await?;
        Ok(())
    }

    async fn load(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    async fn load_parent(&self, task: &Task) -> TaskServiceResult<Project> {
        self.projects
            .find_by_id(task.project_id())
            .await?
            .ok_or(TaskServiceError::ProjectNotFound(task.project_id()))
    }

    /// Recipient lookup happens after the mutation has been persisted, so
    /// a lookup failure only narrows delivery; it never fails the
    /// operation.
    async fn notify_assigned(&self, task: &Task, parent: &Project, users: &BTreeSet<UserId>) {
        if users.is_empty() {
            return;
        }
        let ids: Vec<UserId> = users.iter().copied().collect();
        let recipients: Vec<User> = match self.users.find_by_ids(&ids).await {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(task = %task.id(), %error, "assignee recipient lookup failed");
                return;
            }
        };
        let event = NotificationEvent::TaskAssigned {
            task: TaskSummary::capture(task, Some(parent.name())),
        };
        self.dispatcher.dispatch(&event, &recipients).await;
    }
}
