//! Domain model for notification events and message rendering.

mod event;
mod template;

pub use event::{EventKind, NotificationEvent, ProjectSummary, TaskSummary};
pub use template::{Notice, TemplateError, render_notice};
