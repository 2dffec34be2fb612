//! Policy engine deciding who may act on which resource.
//!
//! Pure decision functions consulted by every service operation before any
//! mutation or read. Evaluation order is fixed: the user self-delete guard
//! runs first, then the admin override, then the per-resource rule tables.
//! A denial is a returned value, never a panic or an early exception.

mod decision;
mod project;
mod task;
mod user;

pub use decision::{AccessDenied, Action, Decision, ResourceKind};
pub use project::project_decision;
pub use task::{TaskAccess, task_decision};
pub use user::user_decision;

#[cfg(test)]
mod tests;
