//! Read scope and filter predicates for project listing.

use super::{Project, ProjectStatus};
use crate::identity::domain::{Actor, UserId};

/// Subset of project rows an actor is permitted to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectScope {
    /// Manager and Admin actors see every project.
    Unrestricted,
    /// Member actors see only projects they created.
    CreatedBy(UserId),
}

impl ProjectScope {
    /// Derives the scope from the acting identity.
    #[must_use]
    pub const fn for_actor(actor: Actor) -> Self {
        if actor.is_member() {
            Self::CreatedBy(actor.id())
        } else {
            Self::Unrestricted
        }
    }

    /// Returns `true` when the scope admits the given project.
    #[must_use]
    pub fn permits(&self, project: &Project) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::CreatedBy(user) => project.created_by() == *user,
        }
    }
}

/// Optional filters ANDed onto a project listing.
///
/// Unset filters impose no constraint; composition is order-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Restrict to projects with this status.
    pub status: Option<ProjectStatus>,
    /// Case-insensitive substring match on the project name.
    pub search: Option<String>,
    /// Requested 1-based page number.
    pub page: Option<u32>,
    /// Requested page size, bounded to `[1, 100]` downstream.
    pub per_page: Option<u32>,
}

impl ProjectFilter {
    /// Creates an empty filter matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to the given status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the listing to names containing the given text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Requests a specific page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Requests a specific page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Returns `true` when every set filter matches the given project.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        let status_ok = self.status.is_none_or(|status| project.status() == status);
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            project
                .name()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        status_ok && search_ok
    }
}
