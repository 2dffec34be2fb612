//! Project aggregate root and update payloads.

use super::{ProjectDomainError, ProjectId, ProjectStatus};
use crate::identity::domain::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Risk score above which a project counts as at risk.
pub const RISK_THRESHOLD: f64 = 70.0;

/// Validated payload for creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    name: String,
    description: Option<String>,
    status: ProjectStatus,
    progress: u8,
    risk_score: Option<f64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl NewProject {
    /// Creates a project payload with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: ProjectStatus::Pending,
            progress: 0,
            risk_score: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the initial progress percentage.
    #[must_use]
    pub const fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress;
        self
    }

    /// Sets the initial risk score.
    #[must_use]
    pub const fn with_risk_score(mut self, risk_score: f64) -> Self {
        self.risk_score = Some(risk_score);
        self
    }

    /// Sets the planned start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the planned end date.
    #[must_use]
    pub const fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

/// Partial-update payload for a project. Unset fields are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectChanges {
    /// Replacement name, if any.
    pub name: Option<String>,
    /// Replacement description, if any.
    pub description: Option<String>,
    /// Replacement status, if any.
    pub status: Option<ProjectStatus>,
    /// Replacement progress percentage, if any.
    pub progress: Option<u8>,
    /// Replacement risk score, if any.
    pub risk_score: Option<f64>,
    /// Replacement start date, if any.
    pub start_date: Option<NaiveDate>,
    /// Replacement end date, if any.
    pub end_date: Option<NaiveDate>,
}

/// What a project update changed, as observed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectUpdateOutcome {
    /// `true` when the risk score crossed from at-or-below the threshold
    /// (or unset) to above it. The crossing, not the value, is what
    /// triggers an at-risk notification.
    pub became_at_risk: bool,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted status.
    pub status: ProjectStatus,
    /// Persisted progress percentage.
    pub progress: u8,
    /// Persisted risk score, if any.
    pub risk_score: Option<f64>,
    /// Persisted start date, if any.
    pub start_date: Option<NaiveDate>,
    /// Persisted end date, if any.
    pub end_date: Option<NaiveDate>,
    /// Persisted creator identifier.
    pub created_by: UserId,
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

/// Project aggregate root.
///
/// Mutated only through domain methods so derived-field invariants (risk
/// transition detection, assignment diffing) always hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: Option<String>,
    status: ProjectStatus,
    progress: u8,
    risk_score: Option<f64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    created_by: UserId,
    assigned_users: BTreeSet<UserId>,
    archived_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Creates a project from a validated payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when the name is empty, progress or
    /// risk score is out of range, or the end date precedes the start date.
    pub fn create(
        payload: NewProject,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let name = validated_name(&payload.name)?;
        validate_progress(payload.progress)?;
        validate_risk_score(payload.risk_score)?;
        validate_dates(payload.start_date, payload.end_date)?;

        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            name,
            description: payload.description,
            status: payload.status,
            progress: payload.progress,
            risk_score: payload.risk_score,
            start_date: payload.start_date,
            end_date: payload.end_date,
            created_by,
            assigned_users: BTreeSet::new(),
            archived_at: None,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            status: data.status,
            progress: data.progress,
            risk_score: data.risk_score,
            start_date: data.start_date,
            end_date: data.end_date,
            created_by: data.created_by,
            assigned_users: data.assigned_users,
            archived_at: data.archived_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the progress percentage.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Returns the risk score, if one has been recorded.
    #[must_use]
    pub const fn risk_score(&self) -> Option<f64> {
        self.risk_score
    }

    /// Returns the planned start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the planned end date, if any.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns the creator's identifier.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
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

    /// Returns `true` when the project has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns `true` when the project has been archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Returns `true` when the given user created the project or sits in
    /// its assignment set.
    #[must_use]
    pub fn involves(&self, user: UserId) -> bool {
        self.created_by == user || self.assigned_users.contains(&user)
    }

    /// Applies a partial update, reporting whether the risk score crossed
    /// the at-risk threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when a provided field fails
    /// validation; the record is untouched on error.
    pub fn apply(
        &mut self,
        changes: &ProjectChanges,
        clock: &impl Clock,
    ) -> Result<ProjectUpdateOutcome, ProjectDomainError> {
        let name = changes.name.as_deref().map(validated_name).transpose()?;
        if let Some(progress) = changes.progress {
            validate_progress(progress)?;
        }
        validate_risk_score(changes.risk_score)?;
        let effective_start = changes.start_date.or(self.start_date);
        let effective_end = changes.end_date.or(self.end_date);
        validate_dates(effective_start, effective_end)?;

        let previous_risk = self.risk_score;

        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = changes.description.clone() {
            self.description = Some(value);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(progress) = changes.progress {
            self.progress = progress;
        }
        if let Some(risk_score) = changes.risk_score {
            self.risk_score = Some(risk_score);
        }
        self.start_date = effective_start;
        self.end_date = effective_end;
        self.updated_at = clock.utc();

        Ok(ProjectUpdateOutcome {
            became_at_risk: crossed_risk_threshold(previous_risk, self.risk_score),
        })
    }

    /// Adds the requested users to the assignment set, returning the users
    /// that were newly added. Re-adding an already-assigned user is not
    /// reported as new.
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

    /// Marks the project archived.
    pub fn archive(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.archived_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    /// Marks the project soft-deleted.
    pub fn mark_deleted(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.updated_at = timestamp;
    }
}

/// Returns `true` when the risk score moved from at-or-below the threshold
/// (or unset) to above it.
#[must_use]
pub(crate) fn crossed_risk_threshold(previous: Option<f64>, current: Option<f64>) -> bool {
    let now_above = current.is_some_and(|score| score > RISK_THRESHOLD);
    let was_above = previous.is_some_and(|score| score > RISK_THRESHOLD);
    now_above && !was_above
}

fn validated_name(raw: &str) -> Result<String, ProjectDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProjectDomainError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

const fn validate_progress(progress: u8) -> Result<(), ProjectDomainError> {
    if progress > 100 {
        return Err(ProjectDomainError::ProgressOutOfRange(progress));
    }
    Ok(())
}

fn validate_risk_score(risk_score: Option<f64>) -> Result<(), ProjectDomainError> {
    if let Some(score) = risk_score {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(ProjectDomainError::RiskScoreOutOfRange(score));
        }
    }
    Ok(())
}

fn validate_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ProjectDomainError> {
    if let (Some(start_date), Some(end_date)) = (start, end) {
        if end_date < start_date {
            return Err(ProjectDomainError::EndBeforeStart {
                start: start_date,
                end: end_date,
            });
        }
    }
    Ok(())
}
