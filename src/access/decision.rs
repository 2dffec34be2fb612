//! Actions, decisions, and the authorization-denied error value.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Action an actor wants to perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// List resources of a kind.
    ViewAny,
    /// Read one resource.
    View,
    /// Create a resource.
    Create,
    /// Mutate an existing resource.
    Update,
    /// Remove a resource.
    Delete,
}

impl Action {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewAny => "view_any",
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource kind an action targets, used in denial reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A project record.
    Project,
    /// A task record.
    Task,
    /// A user record.
    User,
}

impl ResourceKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Task => "task",
            Self::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The actor may proceed.
    Allow,
    /// The actor may not proceed.
    Deny,
}

impl Decision {
    /// Maps a boolean rule result onto a decision.
    #[must_use]
    pub const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }

    /// Returns `true` for [`Decision::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the decision into a result, surfacing a denial as
    /// [`AccessDenied`] for the given resource and action.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when the decision is [`Decision::Deny`].
    pub const fn require(self, resource: ResourceKind, action: Action) -> Result<(), AccessDenied> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(AccessDenied { resource, action }),
        }
    }
}

/// Client-visible "forbidden" outcome of a failed policy check.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{action} on {resource} denied")]
pub struct AccessDenied {
    /// Resource kind the action targeted.
    pub resource: ResourceKind,
    /// Action that was denied.
    pub action: Action,
}
