//! Repository port for project persistence, lookup, and scoped listing.

use crate::identity::domain::UserId;
use crate::paging::{PageOf, PageRequest};
use crate::project::domain::{Project, ProjectFilter, ProjectId, ProjectScope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
///
/// Lookup and listing exclude soft-deleted records. Concurrent writers are
/// serialized by the implementation; a single update is observed
/// atomically.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the
    /// identifier already exists.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Finds a project by identifier. Returns `None` for unknown or
    /// soft-deleted records.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Lists projects admitted by the scope and matching the filter, in
    /// stable creation order, one bounded page at a time.
    async fn list(
        &self,
        scope: &ProjectScope,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> ProjectRepositoryResult<PageOf<Project>>;

    /// Marks a project soft-deleted at the given instant.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist.
    async fn soft_delete(&self, id: ProjectId, when: DateTime<Utc>)
    -> ProjectRepositoryResult<()>;

    /// Returns projects whose risk score exceeds the threshold and that are
    /// neither archived, completed, nor deleted. Feeds the at-risk sweep.
    async fn find_at_risk(&self, threshold: f64) -> ProjectRepositoryResult<Vec<Project>>;

    /// Returns the identifiers of projects the given user created or is
    /// assigned to. Feeds the task read scope for Member actors.
    async fn list_ids_involving(&self, user: UserId)
    -> ProjectRepositoryResult<BTreeSet<ProjectId>>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
