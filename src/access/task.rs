//! Authorization rules for task resources.

use super::{Action, Decision};
use crate::identity::domain::Actor;
use crate::project::domain::Project;
use crate::task::domain::Task;

/// A task together with its parent project, as the task rules need both.
#[derive(Debug, Clone, Copy)]
pub struct TaskAccess<'a> {
    task: &'a Task,
    project: &'a Project,
}

impl<'a> TaskAccess<'a> {
    /// Pairs a task with its parent project.
    #[must_use]
    pub const fn new(task: &'a Task, project: &'a Project) -> Self {
        Self { task, project }
    }

    /// Returns `true` when the user may read or mutate the task through
    /// involvement: primary assignee, in the task's assigned set, in the
    /// parent project's assigned set, or the parent project's creator.
    #[must_use]
    pub fn involves(&self, user: crate::identity::domain::UserId) -> bool {
        self.task.assignee() == user
            || self.task.assigned_users().contains(&user)
            || self.project.involves(user)
    }

    /// Returns `true` when the user created the parent project.
    #[must_use]
    pub fn owns_parent_project(&self, user: crate::identity::domain::UserId) -> bool {
        self.project.created_by() == user
    }
}

/// Decides whether `actor` may perform `action` on a task.
///
/// `context` is required for [`Action::View`], [`Action::Update`], and
/// [`Action::Delete`]; passing `None` there denies. Admins are allowed
/// unconditionally. Listing is open to every authenticated actor.
#[must_use]
pub fn task_decision(actor: Actor, action: Action, context: Option<TaskAccess<'_>>) -> Decision {
    if actor.is_admin() {
        return Decision::Allow;
    }
    let allowed = match action {
        Action::ViewAny => true,
        Action::View | Action::Update => context
            .is_some_and(|subject| actor.is_manager() || subject.involves(actor.id())),
        Action::Create => actor.is_manager(),
        Action::Delete => context.is_some_and(|subject| {
            actor.is_manager() || subject.owns_parent_project(actor.id())
        }),
    };
    Decision::from_bool(allowed)
}
