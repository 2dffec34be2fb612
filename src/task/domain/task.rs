//! Task aggregate root and normalized payloads.

use super::{TaskDomainError, TaskId, TaskPriority, TaskStatus};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Validated payload for creating a task.
///
/// Carries the raw estimate inputs; `estimated_hours` is converted to
/// minutes (and dropped) during aggregate construction, and supplying both
/// estimate fields is rejected there.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    title: String,
    description: Option<String>,
    project_id: ProjectId,
    assignee: Option<UserId>,
    status: TaskStatus,
    priority: TaskPriority,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    estimate_minutes: Option<u32>,
    estimated_hours: Option<f64>,
    actual_minutes: Option<u32>,
    assigned_users: BTreeSet<UserId>,
}

impl NewTask {
    /// Creates a task payload with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, project_id: ProjectId) -> Self {
        Self {
            title: title.into(),
            description: None,
            project_id,
            assignee: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            start_date: None,
            due_date: None,
            estimate_minutes: None,
            estimated_hours: None,
            actual_minutes: None,
            assigned_users: BTreeSet::new(),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the primary assignee. When omitted, the creating actor is used.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the planned start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the estimate in minutes.
    #[must_use]
    pub const fn with_estimate_minutes(mut self, minutes: u32) -> Self {
        self.estimate_minutes = Some(minutes);
        self
    }

    /// Sets the estimate in hours, converted to minutes on construction.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets the minutes already spent.
    #[must_use]
    pub const fn with_actual_minutes(mut self, minutes: u32) -> Self {
        self.actual_minutes = Some(minutes);
        self
    }

    /// Sets the initial assignment set.
    #[must_use]
    pub fn with_assigned_users(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.assigned_users = users.into_iter().collect();
        self
    }

    /// Returns the requested initial assignment set.
    #[must_use]
    pub const fn assigned_users(&self) -> &BTreeSet<UserId> {
        &self.assigned_users
    }

    /// Returns the parent project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Partial-update payload for a task. Unset fields are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    /// Replacement title, if any.
    pub title: Option<String>,
    /// Replacement description, if any.
    pub description: Option<String>,
    /// Replacement status, if any. Drives the completion-timestamp rule.
    pub status: Option<TaskStatus>,
    /// Replacement priority, if any.
    pub priority: Option<TaskPriority>,
    /// Replacement primary assignee, if any.
    pub assignee: Option<UserId>,
    /// Replacement start date, if any.
    pub start_date: Option<NaiveDate>,
    /// Replacement due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Replacement estimate in minutes, if any.
    pub estimate_minutes: Option<u32>,
    /// Replacement estimate in hours; mutually exclusive with
    /// `estimate_minutes`, converted and dropped on apply.
    pub estimated_hours: Option<f64>,
    /// Replacement spent minutes, if any.
    pub actual_minutes: Option<u32>,
    /// Replacement assignment set; handled by the service's sync-and-diff.
    pub assigned_users: Option<BTreeSet<UserId>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted parent project identifier.
    pub project_id: ProjectId,
    /// Persisted primary assignee.
    pub assignee: UserId,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted start date, if any.
    pub start_date: Option<NaiveDate>,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted estimate in minutes, if any.
    pub estimate_minutes: Option<u32>,
    /// Persisted spent minutes, if any.
    pub actual_minutes: Option<u32>,
    /// Persisted completion timestamp, if completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted assignment set.
    pub assigned_users: BTreeSet<UserId>,
    /// Archival timestamp, if archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp, if removed.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Task aggregate root.
///
/// Belongs to exactly one project; mutated only through domain methods so
/// the completion-timestamp and estimate invariants always hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    project_id: ProjectId,
    assignee: UserId,
    status: TaskStatus,
    priority: TaskPriority,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    estimate_minutes: Option<u32>,
    actual_minutes: Option<u32>,
    completed_at: Option<DateTime<Utc>>,
    assigned_users: BTreeSet<UserId>,
    archived_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task from a validated payload.
    ///
    /// `fallback_assignee` (the creating actor) becomes the primary
    /// assignee when the payload does not name one. A payload status of
    /// [`TaskStatus::Completed`] stamps `completed_at` with the current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title is empty, both estimate
    /// fields are supplied, the hour estimate is invalid, or the due date
    /// precedes the start date.
    pub fn create(
        payload: NewTask,
        fallback_assignee: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = validated_title(&payload.title)?;
        let estimate_minutes =
            resolve_estimate(payload.estimate_minutes, payload.estimated_hours)?;
        validate_dates(payload.start_date, payload.due_date)?;

        let timestamp = clock.utc();
        let completed_at =
            (payload.status == TaskStatus::Completed).then_some(timestamp);
        Ok(Self {
            id: TaskId::new(),
            title,
            description: payload.description,
            project_id: payload.project_id,
            assignee: payload.assignee.unwrap_or(fallback_assignee),
            status: payload.status,
            priority: payload.priority,
            start_date: payload.start_date,
            due_date: payload.due_date,
            estimate_minutes,
            actual_minutes: payload.actual_minutes,
            completed_at,
            assigned_users: payload.assigned_users,
            archived_at: None,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            project_id: data.project_id,
            assignee: data.assignee,
            status: data.status,
            priority: data.priority,
            start_date: data.start_date,
            due_date: data.due_date,
            estimate_minutes: data.estimate_minutes,
            actual_minutes: data.actual_minutes,
            completed_at: data.completed_at,
            assigned_users: data.assigned_users,
            archived_at: data.archived_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the parent project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the primary assignee.
    #[must_use]
    pub const fn assignee(&self) -> UserId {
        self.assignee
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the planned start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the estimate in minutes, if any.
    #[must_use]
    pub const fn estimate_minutes(&self) -> Option<u32> {
        self.estimate_minutes
    }

    /// Returns the minutes already spent, if recorded.
    #[must_use]
    pub const fn actual_minutes(&self) -> Option<u32> {
        self.actual_minutes
    }

    /// Returns the completion timestamp, set iff the status is
    /// [`TaskStatus::Completed`].
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the assignment set.
    #[must_use]
    pub const fn assigned_users(&self) -> &BTreeSet<UserId> {
        &self.assigned_users
    }

    /// Returns the archival timestamp, if archived.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the soft-deletion timestamp, if any.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` when the record has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns `true` when the task has been archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Applies a partial update with payload normalization.
    ///
    /// The completion timestamp tracks the resulting status: entering
    /// [`TaskStatus::Completed`] stamps it, keeping an existing stamp so
    /// repeated completion does not reset it, and any other resulting
    /// status clears it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when a provided field fails validation;
    /// the record is untouched on error.
    pub fn apply(
        &mut self,
        changes: &TaskChanges,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let title = changes.title.as_deref().map(validated_title).transpose()?;
        let estimate = resolve_estimate(changes.estimate_minutes, changes.estimated_hours)?;
        let effective_start = changes.start_date.or(self.start_date);
        let effective_due = changes.due_date.or(self.due_date);
        validate_dates(effective_start, effective_due)?;

        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = changes.description.clone() {
            self.description = Some(value);
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(assignee) = changes.assignee {
            self.assignee = assignee;
        }
        if let Some(minutes) = estimate {
            self.estimate_minutes = Some(minutes);
        }
        if let Some(minutes) = changes.actual_minutes {
            self.actual_minutes = Some(minutes);
        }
        self.start_date = effective_start;
        self.due_date = effective_due;
        self.status = changes.status.unwrap_or(self.status);

        let timestamp = clock.utc();
        self.completed_at = if self.status == TaskStatus::Completed {
            self.completed_at.or(Some(timestamp))
        } else {
            None
        };
        self.updated_at = timestamp;
        Ok(())
    }

    /// Adds the requested users to the assignment set, returning the users
    /// that were newly added.
    pub fn attach_users(
        &mut self,
        requested: &BTreeSet<UserId>,
        clock: &impl Clock,
    ) -> BTreeSet<UserId> {
        let newly_added: BTreeSet<UserId> = requested
            .difference(&self.assigned_users)
            .copied()
            .collect();
        if !newly_added.is_empty() {
            self.assigned_users.extend(newly_added.iter().copied());
            self.updated_at = clock.utc();
        }
        newly_added
    }

    /// Replaces the assignment set with the requested users, returning the
    /// users that were newly added by the replacement.
    pub fn replace_users(
        &mut self,
        requested: &BTreeSet<UserId>,
        clock: &impl Clock,
    ) -> BTreeSet<UserId> {
        let newly_added: BTreeSet<UserId> = requested
            .difference(&self.assigned_users)
            .copied()
            .collect();
        if &self.assigned_users != requested {
            self.assigned_users = requested.clone();
            self.updated_at = clock.utc();
        }
        newly_added
    }

    /// Marks the task archived.
    pub fn archive(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.archived_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    /// Marks the task soft-deleted.
    pub fn mark_deleted(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.updated_at = timestamp;
    }
}

/// Resolves the mutually-exclusive estimate inputs to stored minutes.
///
/// # Errors
///
/// Returns [`TaskDomainError::EstimateConflict`] when both fields are
/// supplied, regardless of their values, or
/// [`TaskDomainError::InvalidEstimatedHours`] for a negative or non-finite
/// hour estimate.
fn resolve_estimate(
    minutes: Option<u32>,
    hours: Option<f64>,
) -> Result<Option<u32>, TaskDomainError> {
    match (minutes, hours) {
        (Some(_), Some(_)) => Err(TaskDomainError::EstimateConflict),
        (Some(value), None) => Ok(Some(value)),
        (None, Some(value)) => {
            if !value.is_finite() || value < 0.0 {
                return Err(TaskDomainError::InvalidEstimatedHours(value));
            }
            Ok(Some(hours_to_minutes(value)))
        }
        (None, None) => Ok(None),
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "hour estimates round to the nearest whole minute; input is validated non-negative and finite"
)]
fn hours_to_minutes(hours: f64) -> u32 {
    (hours * 60.0).round() as u32
}

fn validated_title(raw: &str) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn validate_dates(
    start: Option<NaiveDate>,
    due: Option<NaiveDate>,
) -> Result<(), TaskDomainError> {
    if let (Some(start_date), Some(due_date)) = (start, due) {
        if due_date < start_date {
            return Err(TaskDomainError::DueBeforeStart {
                start: start_date,
                due: due_date,
            });
        }
    }
    Ok(())
}
