//! Authorization rules for user resources.

use super::{Action, Decision};
use crate::identity::domain::{Actor, User};

/// Decides whether `actor` may perform `action` on a user record.
///
/// User management is Admin-only. The self-delete guard is the one rule
/// evaluated before the admin override: no actor, Admin included, may
/// delete their own account.
#[must_use]
pub fn user_decision(actor: Actor, action: Action, subject: Option<&User>) -> Decision {
    if action == Action::Delete
        && subject.is_some_and(|target| target.id() == actor.id())
    {
        return Decision::Deny;
    }
    Decision::from_bool(actor.is_admin())
}
