//! Repository port for task persistence, lookup, and scoped listing.

use crate::paging::{PageOf, PageRequest};
use crate::task::domain::{Task, TaskFilter, TaskId, TaskScope};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Lookup and listing exclude soft-deleted records. Concurrent writers are
/// serialized by the implementation; a single update is observed
/// atomically.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier. Returns `None` for unknown or
    /// soft-deleted records.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks admitted by the scope and matching the filter, in
    /// stable creation order, one bounded page at a time.
    async fn list(
        &self,
        scope: &TaskScope,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> TaskRepositoryResult<PageOf<Task>>;

    /// Marks a task soft-deleted at the given instant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn soft_delete(&self, id: TaskId, when: DateTime<Utc>) -> TaskRepositoryResult<()>;

    /// Returns tasks whose due date falls within `[today, today + days]`
    /// and whose status is not completed, skipping archived and deleted
    /// records. Feeds the due-soon sweep.
    async fn find_due_within(&self, today: NaiveDate, days: u32)
    -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
