//! Notification event kinds and the subject snapshots they carry.

use crate::project::domain::{Project, ProjectId};
use crate::task::domain::{Task, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed set of notification event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A user was newly assigned to a task.
    TaskAssigned,
    /// A task's due date falls within the reminder window.
    TaskDueSoon,
    /// A project's risk score crossed the at-risk threshold.
    ProjectAtRisk,
    /// A user was newly added to a project.
    ProjectUserAdded,
    /// A user was invited to the platform.
    UserInvited,
}

impl EventKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::TaskDueSoon => "task_due_soon",
            Self::ProjectAtRisk => "project_at_risk",
            Self::ProjectUserAdded => "project_user_added",
            Self::UserInvited => "user_invited",
        }
    }
}

/// Project facts captured at dispatch time for message rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project identifier.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Project description, if any.
    pub description: Option<String>,
    /// Display label of the status at dispatch time.
    pub status_label: String,
    /// Progress percentage at dispatch time.
    pub progress: u8,
    /// Risk score at dispatch time, if any.
    pub risk_score: Option<f64>,
    /// Planned end date, if any.
    pub end_date: Option<NaiveDate>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id(),
            name: project.name().to_owned(),
            description: project.description().map(str::to_owned),
            status_label: project.status().label().to_owned(),
            progress: project.progress(),
            risk_score: project.risk_score(),
            end_date: project.end_date(),
        }
    }
}

/// Task facts captured at dispatch time for message rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Parent project name, when the projection includes it.
    pub project_name: Option<String>,
    /// Display label of the status at dispatch time.
    pub status_label: String,
    /// Display label of the priority at dispatch time.
    pub priority_label: String,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
}

impl TaskSummary {
    /// Captures task facts, with the parent project name when known.
    #[must_use]
    pub fn capture(task: &Task, project_name: Option<&str>) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_owned(),
            project_name: project_name.map(str::to_owned),
            status_label: task.status().label().to_owned(),
            priority_label: task.priority().label().to_owned(),
            due_date: task.due_date(),
        }
    }
}

/// A qualifying state change together with the subject facts templates
/// render from. Recipient selection happens at the dispatch site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A user was newly assigned to the task.
    TaskAssigned {
        /// Task the recipients were assigned to.
        task: TaskSummary,
    },
    /// The task is due within the reminder window.
    TaskDueSoon {
        /// Task approaching its due date.
        task: TaskSummary,
    },
    /// The project's risk score crossed the threshold.
    ProjectAtRisk {
        /// Project that became at risk.
        project: ProjectSummary,
    },
    /// A user was newly added to the project.
    ProjectUserAdded {
        /// Project the recipients were added to.
        project: ProjectSummary,
    },
    /// A user was invited to the platform.
    UserInvited {
        /// Link the recipient follows to accept.
        invitation_url: String,
        /// Project attached to the invitation, if any.
        project: Option<ProjectSummary>,
    },
}

impl NotificationEvent {
    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::TaskAssigned { .. } => EventKind::TaskAssigned,
            Self::TaskDueSoon { .. } => EventKind::TaskDueSoon,
            Self::ProjectAtRisk { .. } => EventKind::ProjectAtRisk,
            Self::ProjectUserAdded { .. } => EventKind::ProjectUserAdded,
            Self::UserInvited { .. } => EventKind::UserInvited,
        }
    }
}
