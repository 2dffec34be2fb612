//! Task status closed set.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
///
/// Any status may be set to any other by an authorized actor; validity is
/// closed-set membership only. Entering or leaving [`TaskStatus::Completed`]
/// drives the completion-timestamp rule on the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is under way.
    InProgress,
    /// Work is finished.
    Completed,
    /// Work is blocked on something external.
    Blocked,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }

    /// Returns the display label for this status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Todo => "En attente",
            Self::InProgress => "En cours",
            Self::Completed => "Terminé",
            Self::Blocked => "Bloqué",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "blocked" => Ok(Self::Blocked),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
