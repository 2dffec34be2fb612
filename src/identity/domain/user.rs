//! User aggregate root.

use super::{IdentityDomainError, UserId, UserRole};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
    role: UserRole,
}

impl NewUser {
    /// Creates a user payload.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}

/// Partial-update payload for a user record. Unset fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// Replacement display name, if any.
    pub name: Option<String>,
    /// Replacement email address, if any.
    pub email: Option<String>,
    /// Replacement role, if any.
    pub role: Option<UserRole>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: String,
    /// Persisted email address.
    pub email: String,
    /// Persisted role.
    pub role: UserRole,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp, if the record was removed.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: UserRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a user from a validated payload.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyName`] when the trimmed name is
    /// empty, or [`IdentityDomainError::InvalidEmail`] when the email lacks
    /// a local part or domain.
    pub fn create(payload: NewUser, clock: &impl Clock) -> Result<Self, IdentityDomainError> {
        let name = validated_name(&payload.name)?;
        let email = validated_email(&payload.email)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: UserId::new(),
            name,
            email,
            role: payload.role,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            role: data.role,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the platform role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the soft-deletion timestamp, if any.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` when the record has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Applies a partial update to the record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError`] when a provided field fails
    /// validation; the record is untouched on error.
    pub fn apply(
        &mut self,
        changes: &UserChanges,
        clock: &impl Clock,
    ) -> Result<(), IdentityDomainError> {
        let name = changes.name.as_deref().map(validated_name).transpose()?;
        let email = changes.email.as_deref().map(validated_email).transpose()?;

        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Marks the record soft-deleted.
    pub fn mark_deleted(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    /// Returns the actor snapshot for requests made by this user.
    #[must_use]
    pub const fn as_actor(&self) -> super::Actor {
        super::Actor::new(self.id, self.role)
    }
}

fn validated_name(raw: &str) -> Result<String, IdentityDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentityDomainError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

fn validated_email(raw: &str) -> Result<String, IdentityDomainError> {
    let trimmed = raw.trim();
    let mut parts = trimmed.split('@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    let trailing = parts.next().is_some();
    if local.is_empty() || domain.is_empty() || trailing || !domain.contains('.') {
        return Err(IdentityDomainError::InvalidEmail(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}
