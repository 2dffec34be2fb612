//! Read scope and filter predicates for task listing.

use super::{Task, TaskPriority, TaskStatus};
use crate::identity::domain::{Actor, UserId};
use crate::project::domain::ProjectId;
use std::collections::BTreeSet;

/// Subset of task rows an actor is permitted to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskScope {
    /// Manager and Admin actors see every task.
    Unrestricted,
    /// Member actors see tasks they are involved in: primary assignee, in
    /// the task's assigned set, or belonging to a project they created or
    /// are assigned to.
    Involving {
        /// The member's identifier.
        user: UserId,
        /// Projects the member created or is assigned to.
        project_ids: BTreeSet<ProjectId>,
    },
}

impl TaskScope {
    /// Derives the scope from the acting identity and the projects that
    /// identity is involved in.
    #[must_use]
    pub fn for_actor(actor: Actor, involved_projects: BTreeSet<ProjectId>) -> Self {
        if actor.is_member() {
            Self::Involving {
                user: actor.id(),
                project_ids: involved_projects,
            }
        } else {
            Self::Unrestricted
        }
    }

    /// Returns `true` when the scope admits the given task.
    #[must_use]
    pub fn permits(&self, task: &Task) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Involving { user, project_ids } => {
                task.assignee() == *user
                    || task.assigned_users().contains(user)
                    || project_ids.contains(&task.project_id())
            }
        }
    }
}

/// Optional filters ANDed onto a task listing.
///
/// Unset filters impose no constraint; composition is order-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to tasks with this status.
    pub status: Option<TaskStatus>,
    /// Restrict to tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Restrict to tasks of this project.
    pub project_id: Option<ProjectId>,
    /// Restrict to tasks where this user is the primary assignee or in the
    /// assigned set.
    pub user_id: Option<UserId>,
    /// Case-insensitive substring match on the task title.
    pub search: Option<String>,
    /// Requested 1-based page number.
    pub page: Option<u32>,
    /// Requested page size, bounded to `[1, 100]` downstream.
    pub per_page: Option<u32>,
}

impl TaskFilter {
    /// Creates an empty filter matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to the given status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the listing to the given priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts the listing to one project.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Restricts the listing to tasks involving one user.
    #[must_use]
    pub const fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restricts the listing to titles containing the given text.
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

    /// Returns `true` when every set filter matches the given task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = self.status.is_none_or(|status| task.status() == status);
        let priority_ok = self
            .priority
            .is_none_or(|priority| task.priority() == priority);
        let project_ok = self
            .project_id
            .is_none_or(|project_id| task.project_id() == project_id);
        let user_ok = self.user_id.is_none_or(|user_id| {
            task.assignee() == user_id || task.assigned_users().contains(&user_id)
        });
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            task.title().to_lowercase().contains(&needle.to_lowercase())
        });
        status_ok && priority_ok && project_ok && user_ok && search_ok
    }
}
