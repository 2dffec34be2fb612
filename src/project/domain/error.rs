//! Error types for project domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating project domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyName,

    /// Progress is outside the `[0, 100]` range.
    #[error("progress {0} is out of range, expected 0..=100")]
    ProgressOutOfRange(u8),

    /// Risk score is outside the `[0, 100]` range or not a finite number.
    #[error("risk score {0} is out of range, expected 0..=100")]
    RiskScoreOutOfRange(f64),

    /// The end date precedes the start date.
    #[error("end date {end} precedes start date {start}")]
    EndBeforeStart {
        /// Effective start date after the update.
        start: chrono::NaiveDate,
        /// Effective end date after the update.
        end: chrono::NaiveDate,
    },
}

/// Error returned while parsing project statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);
