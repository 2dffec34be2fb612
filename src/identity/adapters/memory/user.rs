//! Thread-safe in-memory user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{User, UserId, UserRole},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// In-memory user repository backing tests and reference wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        state.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.contains_key(&user.id()) {
            return Err(UserRepositoryError::NotFound(user.id()));
        }
        state.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).filter(|user| !user.is_deleted()).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut users: Vec<User> = ids
            .iter()
            .filter_map(|id| state.get(id))
            .filter(|user| !user.is_deleted())
            .cloned()
            .collect();
        users.sort_by_key(User::id);
        Ok(users)
    }

    async fn list_by_role(&self, role: UserRole) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut users: Vec<User> = state
            .values()
            .filter(|user| user.role() == role && !user.is_deleted())
            .cloned()
            .collect();
        users.sort_by_key(User::id);
        Ok(users)
    }

    async fn soft_delete(&self, id: UserId, when: DateTime<Utc>) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let user = state.get_mut(&id).ok_or(UserRepositoryError::NotFound(id))?;
        *user = deleted_copy(user, when);
        Ok(())
    }
}

fn deleted_copy(user: &User, when: DateTime<Utc>) -> User {
    use crate::identity::domain::PersistedUserData;
    User::from_persisted(PersistedUserData {
        id: user.id(),
        name: user.name().to_owned(),
        email: user.email().to_owned(),
        role: user.role(),
        created_at: user.created_at(),
        updated_at: when,
        deleted_at: Some(when),
    })
}
