//! Thread-safe in-memory task repository.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::paging::{PageOf, PageRequest};
use crate::task::{
    domain::{Task, TaskFilter, TaskId, TaskScope, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// In-memory task repository backing tests and reference wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Stable listing order: creation time, then id as a tiebreaker.
fn ordered(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by_key(|task| (task.created_at(), task.id()));
    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).filter(|task| !task.is_deleted()).cloned())
    }

    async fn list(
        &self,
        scope: &TaskScope,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> TaskRepositoryResult<PageOf<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let matching: Vec<Task> = state
            .values()
            .filter(|task| !task.is_deleted() && scope.permits(task) && filter.matches(task))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let items = ordered(matching)
            .into_iter()
            .skip(page.offset())
            .take(page.per_page() as usize)
            .collect();
        Ok(PageOf::new(items, total, page))
    }

    async fn soft_delete(&self, id: TaskId, when: DateTime<Utc>) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let task = state.get_mut(&id).ok_or(TaskRepositoryError::NotFound(id))?;
        *task = deleted_copy(task, when);
        Ok(())
    }

    async fn find_due_within(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let horizon = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        let state = self.state.read().map_err(lock_poisoned)?;
        let matching: Vec<Task> = state
            .values()
            .filter(|task| {
                !task.is_deleted()
                    && !task.is_archived()
                    && task.status() != TaskStatus::Completed
                    && task
                        .due_date()
                        .is_some_and(|due| due >= today && due <= horizon)
            })
            .cloned()
            .collect();
        Ok(ordered(matching))
    }
}

fn deleted_copy(task: &Task, when: DateTime<Utc>) -> Task {
    use crate::task::domain::PersistedTaskData;
    Task::from_persisted(PersistedTaskData {
        id: task.id(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        project_id: task.project_id(),
        assignee: task.assignee(),
        status: task.status(),
        priority: task.priority(),
        start_date: task.start_date(),
        due_date: task.due_date(),
        estimate_minutes: task.estimate_minutes(),
        actual_minutes: task.actual_minutes(),
        completed_at: task.completed_at(),
        assigned_users: task.assigned_users().clone(),
        archived_at: task.archived_at(),
        created_at: task.created_at(),
        updated_at: when,
        deleted_at: Some(when),
    })
}
