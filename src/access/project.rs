//! Authorization rules for project resources.

use super::{Action, Decision};
use crate::identity::domain::Actor;
use crate::project::domain::Project;

/// Decides whether `actor` may perform `action` on a project.
///
/// `project` is required for [`Action::View`], [`Action::Update`], and
/// [`Action::Delete`]; passing `None` there denies. Admins are allowed
/// unconditionally. Mutation is Manager-only; reads broaden to the
/// project's creator and assigned users.
#[must_use]
pub fn project_decision(actor: Actor, action: Action, project: Option<&Project>) -> Decision {
    if actor.is_admin() {
        return Decision::Allow;
    }
    let allowed = match action {
        Action::ViewAny => actor.is_manager() || actor.is_member(),
        Action::View => project.is_some_and(|subject| {
            actor.is_manager() || subject.involves(actor.id())
        }),
        Action::Create => actor.is_manager(),
        Action::Update | Action::Delete => project.is_some() && actor.is_manager(),
    };
    Decision::from_bool(allowed)
}
