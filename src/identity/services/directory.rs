//! Admin-only user management and invitation delivery.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;

use crate::access::{Action, AccessDenied, ResourceKind, user_decision};
use crate::identity::{
    domain::{Actor, IdentityDomainError, NewUser, User, UserChanges, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use crate::notification::domain::{NotificationEvent, ProjectSummary};
use crate::notification::ports::NotificationChannel;
use crate::notification::services::NotificationDispatcher;
use crate::project::domain::Project;

/// Invitation link used when the caller does not supply one.
pub const DEFAULT_INVITATION_URL: &str = "/admin";

/// Service-level errors for user directory operations.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// The policy engine denied the action.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// A business invariant beyond shape validation was violated.
    #[error(transparent)]
    Validation(#[from] IdentityDomainError),

    /// The user does not exist or is not visible.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// User management service. Every operation is Admin-only; deleting one's
/// own account is refused even for admins.
#[derive(Clone)]
pub struct UserDirectoryService<U, N, C>
where
    U: UserRepository,
    N: NotificationChannel,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    dispatcher: NotificationDispatcher<N>,
    clock: Arc<C>,
}

impl<U, N, C> UserDirectoryService<U, N, C>
where
    U: UserRepository,
    N: NotificationChannel,
    C: Clock + Send + Sync,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(
        users: Arc<U>,
        dispatcher: NotificationDispatcher<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            users,
            dispatcher,
            clock,
        }
    }

    /// Creates a user record.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Forbidden`] for non-admin actors,
    /// [`UserDirectoryError::Validation`] on invalid payloads, or
    /// [`UserDirectoryError::Repository`] on persistence failure.
    pub async fn create_user(&self, payload: NewUser, actor: Actor) -> UserDirectoryResult<User> {
        user_decision(actor, Action::Create, None).require(ResourceKind::User, Action::Create)?;
        let user = User::create(payload, &*self.clock)?;
        self.users.store(&user).await?;
        Ok(user)
    }

    /// Retrieves one user record.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Forbidden`] for non-admin actors or
    /// [`UserDirectoryError::NotFound`] for unknown users.
    pub async fn get_user(&self, id: UserId, actor: Actor) -> UserDirectoryResult<User> {
        let user = self.load(id).await?;
        user_decision(actor, Action::View, Some(&user))
            .require(ResourceKind::User, Action::View)?;
        Ok(user)
    }

    /// Applies a partial update to a user record.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Forbidden`],
    /// [`UserDirectoryError::NotFound`],
    /// [`UserDirectoryError::Validation`], or
    /// [`UserDirectoryError::Repository`].
    pub async fn update_user(
        &self,
        id: UserId,
        changes: &UserChanges,
        actor: Actor,
    ) -> UserDirectoryResult<User> {
        let mut user = self.load(id).await?;
        user_decision(actor, Action::Update, Some(&user))
            .require(ResourceKind::User, Action::Update)?;
        user.apply(changes, &*self.clock)?;
        self.users.update(&user).await?;
        Ok(user)
    }

    /// Soft-deletes a user record. Self-deletion is refused before the
    /// admin override applies, so even an admin cannot remove their own
    /// account.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Forbidden`],
    /// [`UserDirectoryError::NotFound`], or
    /// [`UserDirectoryError::Repository`].
    pub async fn delete_user(&self, id: UserId, actor: Actor) -> UserDirectoryResult<()> {
        let user = self.load(id).await?;
        user_decision(actor, Action::Delete, Some(&user))
            .require(ResourceKind::User, Action::Delete)?;
        self.users.soft_delete(id, self.clock.utc()).await?;
        Ok(())
    }

    /// Sends an invitation to the given user, optionally tied to a
    /// project. Invitations are user management, so the same Admin-only
    /// rule applies. Delivery is best-effort; the returned count is the
    /// number of successful deliveries (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Forbidden`] or
    /// [`UserDirectoryError::NotFound`].
    pub async fn invite(
        &self,
        id: UserId,
        invitation_url: Option<String>,
        project: Option<&Project>,
        actor: Actor,
    ) -> UserDirectoryResult<usize> {
        let user = self.load(id).await?;
        user_decision(actor, Action::Update, Some(&user))
            .require(ResourceKind::User, Action::Update)?;
        let event = NotificationEvent::UserInvited {
            invitation_url: invitation_url
                .unwrap_or_else(|| DEFAULT_INVITATION_URL.to_owned()),
            project: project.map(ProjectSummary::from),
        };
        Ok(self.dispatcher.dispatch(&event, &[user]).await)
    }

    async fn load(&self, id: UserId) -> UserDirectoryResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(UserDirectoryError::NotFound(id))
    }
}
