//! Thread-safe in-memory project repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::paging::{PageOf, PageRequest};
use crate::project::{
    domain::{Project, ProjectFilter, ProjectId, ProjectScope, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// In-memory project repository backing tests and reference wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Stable listing order: creation time, then id as a tiebreaker.
fn ordered(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by_key(|project| (project.created_at(), project.id()));
    projects
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::NotFound(project.id()));
        }
        state.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .get(&id)
            .filter(|project| !project.is_deleted())
            .cloned())
    }

    async fn list(
        &self,
        scope: &ProjectScope,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> ProjectRepositoryResult<PageOf<Project>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let matching: Vec<Project> = state
            .values()
            .filter(|project| {
                !project.is_deleted() && scope.permits(project) && filter.matches(project)
            })
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

    async fn soft_delete(
        &self,
        id: ProjectId,
        when: DateTime<Utc>,
    ) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let project = state
            .get_mut(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        *project = deleted_copy(project, when);
        Ok(())
    }

    async fn find_at_risk(&self, threshold: f64) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let matching: Vec<Project> = state
            .values()
            .filter(|project| {
                !project.is_deleted()
                    && !project.is_archived()
                    && project.status() != ProjectStatus::Completed
                    && project.risk_score().is_some_and(|score| score > threshold)
            })
            .cloned()
            .collect();
        Ok(ordered(matching))
    }

    async fn list_ids_involving(
        &self,
        user: UserId,
    ) -> ProjectRepositoryResult<BTreeSet<ProjectId>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .values()
            .filter(|project| !project.is_deleted() && project.involves(user))
            .map(Project::id)
            .collect())
    }
}

fn deleted_copy(project: &Project, when: DateTime<Utc>) -> Project {
    use crate::project::domain::PersistedProjectData;
    Project::from_persisted(PersistedProjectData {
        id: project.id(),
        name: project.name().to_owned(),
        description: project.description().map(str::to_owned),
        status: project.status(),
        progress: project.progress(),
        risk_score: project.risk_score(),
        start_date: project.start_date(),
        end_date: project.end_date(),
        created_by: project.created_by(),
        assigned_users: project.assigned_users().clone(),
        archived_at: project.archived_at(),
        created_at: project.created_at(),
        updated_at: when,
        deleted_at: Some(when),
    })
}
