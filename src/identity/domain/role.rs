//! The closed role set and the per-request actor snapshot.

use super::{ParseUserRoleError, UserId};
use serde::{Deserialize, Serialize};

/// Role a user holds across the whole platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access to every resource and to user management.
    Admin,
    /// May create and mutate projects and tasks.
    Manager,
    /// May read what they created or were assigned to.
    Member,
}

impl UserRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Member => "member",
        }
    }

    /// Returns the display label for this role.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Member => "Membre",
        }
    }
}

impl TryFrom<&str> for UserRole {
    type Error = ParseUserRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "member" => Ok(Self::Member),
            _ => Err(ParseUserRoleError(value.to_owned())),
        }
    }
}

/// Authenticated identity attached to every core call.
///
/// Carries exactly what the policy engine and scope builder need: the user
/// id and the role held at the time the request was authenticated. The role
/// is immutable for the lifetime of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: UserRole,
}

impl Actor {
    /// Creates an actor snapshot.
    #[must_use]
    pub const fn new(id: UserId, role: UserRole) -> Self {
        Self { id, role }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub const fn id(self) -> UserId {
        self.id
    }

    /// Returns the role held at request time.
    #[must_use]
    pub const fn role(self) -> UserRole {
        self.role
    }

    /// Returns `true` when the actor holds the Admin role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Returns `true` when the actor holds the Manager role.
    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self.role, UserRole::Manager)
    }

    /// Returns `true` when the actor holds the Member role.
    #[must_use]
    pub const fn is_member(self) -> bool {
        matches!(self.role, UserRole::Member)
    }
}
