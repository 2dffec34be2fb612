//! Project orchestration: authorize, mutate, then dispatch.

use std::collections::BTreeSet;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;

use crate::access::{Action, AccessDenied, ResourceKind, project_decision};
use crate::identity::domain::{Actor, User, UserId, UserRole};
use crate::identity::ports::UserRepository;
use crate::notification::domain::{NotificationEvent, ProjectSummary};
use crate::notification::ports::NotificationChannel;
use crate::notification::services::NotificationDispatcher;
use crate::paging::{PageOf, PageRequest};
use crate::project::{
    domain::{NewProject, Project, ProjectChanges, ProjectDomainError, ProjectFilter, ProjectId,
        ProjectScope},
    ports::{ProjectRepository, ProjectRepositoryError},
};

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// The policy engine denied the action.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// A business invariant beyond shape validation was violated.
    #[error(transparent)]
    Validation(#[from] ProjectDomainError),

    /// The project does not exist or is not visible.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project lifecycle orchestration service.
///
/// Every mutating operation evaluates authorization strictly before
/// mutation, and completes the mutation strictly before notification
/// dispatch; a failed dispatch never rolls back a persisted change.
#[derive(Clone)]
pub struct ProjectService<R, U, N, C>
where
    R: ProjectRepository,
    U: UserRepository,
    N: NotificationChannel,
    C: Clock + Send + Sync,
{
    projects: Arc<R>,
    users: Arc<U>,
    dispatcher: NotificationDispatcher<N>,
    clock: Arc<C>,
}

impl<R, U, N, C> ProjectService<R, U, N, C>
where
    R: ProjectRepository,
    U: UserRepository,
    N: NotificationChannel,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(
        projects: Arc<R>,
        users: Arc<U>,
        dispatcher: NotificationDispatcher<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            projects,
            users,
            dispatcher,
            clock,
        }
    }

    /// Lists the projects the actor may see, filtered and paginated.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Forbidden`] when listing is denied,
    /// or [`ProjectServiceError::Repository`] on persistence failure.
    pub async fn list(
        &self,
        filter: &ProjectFilter,
        actor: Actor,
    ) -> ProjectServiceResult<PageOf<Project>> {
        project_decision(actor, Action::ViewAny, None)
            .require(ResourceKind::Project, Action::ViewAny)?;
        let scope = ProjectScope::for_actor(actor);
        let page = PageRequest::new(filter.page, filter.per_page);
        Ok(self.projects.list(&scope, filter, page).await?)
    }

    /// Retrieves one project the actor may view.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for unknown projects and
    /// [`ProjectServiceError::Forbidden`] when viewing is denied.
    pub async fn get(&self, id: ProjectId, actor: Actor) -> ProjectServiceResult<Project> {
        let project = self.load(id).await?;
        project_decision(actor, Action::View, Some(&project))
            .require(ResourceKind::Project, Action::View)?;
        Ok(project)
    }

    /// Creates a project with the actor as creator. Plain creation
    /// dispatches no notification.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Forbidden`] for non-managers,
    /// [`ProjectServiceError::Validation`] on invalid payloads, or
    /// [`ProjectServiceError::Repository`] on persistence failure.
    pub async fn create(
        &self,
        payload: NewProject,
        actor: Actor,
    ) -> ProjectServiceResult<Project> {
        project_decision(actor, Action::Create, None)
            .require(ResourceKind::Project, Action::Create)?;
        let project = Project::create(payload, actor.id(), &*self.clock)?;
        self.projects.store(&project).await?;
        Ok(project)
    }

    /// Applies a partial update. When the update moves the risk score from
    /// at-or-below the threshold (or unset) to above it, dispatches one
    /// at-risk notification to all admins and the project's assigned
    /// users, deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`],
    /// [`ProjectServiceError::Forbidden`],
    /// [`ProjectServiceError::Validation`], or
    /// [`ProjectServiceError::Repository`]. No partial mutation occurs on
    /// any of these.
    pub async fn update(
        &self,
        id: ProjectId,
        changes: &ProjectChanges,
        actor: Actor,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.load(id).await?;
        project_decision(actor, Action::Update, Some(&project))
            .require(ResourceKind::Project, Action::Update)?;
        let outcome = project.apply(changes, &*self.clock)?;
        self.projects.update(&project).await?;
        if outcome.became_at_risk {
            let recipients = self.at_risk_recipients(&project).await;
            let event = NotificationEvent::ProjectAtRisk {
                project: ProjectSummary::from(&project),
            };
            self.dispatcher.dispatch(&event, &recipients).await;
        }
        Ok(project)
    }

    /// Adds users to the project's assignment set. Only users newly added
    /// by this call are notified; re-adding an already-assigned user
    /// dispatches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`],
    /// [`ProjectServiceError::Forbidden`], or
    /// [`ProjectServiceError::Repository`].
    pub async fn attach_users(
        &self,
        id: ProjectId,
        user_ids: &BTreeSet<UserId>,
        actor: Actor,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.load(id).await?;
        project_decision(actor, Action::Update, Some(&project))
            .require(ResourceKind::Project, Action::Update)?;
        let newly_added = project.attach_users(user_ids, &*self.clock);
        self.projects.update(&project).await?;
        self.notify_added_users(&project, &newly_added).await;
        Ok(project)
    }

    /// Replaces the project's assignment set. Only users newly present
    /// after the replacement are notified.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`],
    /// [`ProjectServiceError::Forbidden`], or
    /// [`ProjectServiceError::Repository`].
    pub async fn sync_users(
        &self,
        id: ProjectId,
        user_ids: &BTreeSet<UserId>,
        actor: Actor,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.load(id).await?;
        project_decision(actor, Action::Update, Some(&project))
            .require(ResourceKind::Project, Action::Update)?;
        let newly_added = project.replace_users(user_ids, &*self.clock);
        self.projects.update(&project).await?;
        self.notify_added_users(&project, &newly_added).await;
        Ok(project)
    }

    /// Soft-deletes a project; the record is retained for audit.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`],
    /// [`ProjectServiceError::Forbidden`], or
    /// [`ProjectServiceError::Repository`].
    pub async fn delete(&self, id: ProjectId, actor: Actor) -> ProjectServiceResult<()> {
        let project = self.load(id).await?;
        project_decision(actor, Action::Delete, Some(&project))
            .require(ResourceKind::Project, Action::Delete)?;
        self.projects.soft_delete(id, self.clock.utc()).await?;
        Ok(())
    }

    async fn load(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))
    }

    /// Admins plus the project's assigned users. Recipient lookup happens
    /// after the mutation has been persisted, so a lookup failure only
    /// narrows delivery; it never fails the operation.
    async fn at_risk_recipients(&self, project: &Project) -> Vec<User> {
        let mut recipients = match self.users.list_by_role(UserRole::Admin).await {
            Ok(admins) => admins,
            Err(error) => {
                tracing::warn!(project = %project.id(), %error, "admin recipient lookup failed");
                Vec::new()
            }
        };
        let assigned: Vec<UserId> = project.assigned_users().iter().copied().collect();
        match self.users.find_by_ids(&assigned).await {
            Ok(users) => recipients.extend(users),
            Err(error) => {
                tracing::warn!(project = %project.id(), %error, "assigned recipient lookup failed");
            }
        }
        recipients
    }

    async fn notify_added_users(&self, project: &Project, newly_added: &BTreeSet<UserId>) {
        if newly_added.is_empty() {
            return;
        }
        let ids: Vec<UserId> = newly_added.iter().copied().collect();
        let recipients = match self.users.find_by_ids(&ids).await {
            Ok(users) => users,
            Err(error) => {
                tracing::warn!(project = %project.id(), %error, "added-user recipient lookup failed");
                return;
            }
        };
        let event = NotificationEvent::ProjectUserAdded {
            project: ProjectSummary::from(project),
        };
        self.dispatcher.dispatch(&event, &recipients).await;
    }
}
