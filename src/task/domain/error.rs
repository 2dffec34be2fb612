//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating task domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// Both `estimated_hours` and `estimate_minutes` were supplied; the two
    /// are mutually exclusive on input.
    #[error("estimated_hours and estimate_minutes are mutually exclusive")]
    EstimateConflict,

    /// The hour estimate is negative or not a finite number.
    #[error("estimated hours {0} is invalid, expected a finite non-negative number")]
    InvalidEstimatedHours(f64),

    /// The due date precedes the start date.
    #[error("due date {due} precedes start date {start}")]
    DueBeforeStart {
        /// Effective start date after the update.
        start: chrono::NaiveDate,
        /// Effective due date after the update.
        due: chrono::NaiveDate,
    },
}

impl TaskDomainError {
    /// Names the payload fields responsible for this validation failure.
    #[must_use]
    pub const fn offending_fields(&self) -> &'static [&'static str] {
        match self {
            Self::EmptyTitle => &["title"],
            Self::EstimateConflict => &["estimated_hours", "estimate_minutes"],
            Self::InvalidEstimatedHours(_) => &["estimated_hours"],
            Self::DueBeforeStart { .. } => &["start_date", "due_date"],
        }
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
