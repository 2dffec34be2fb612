//! Domain model for project lifecycle management.

mod error;
mod filter;
mod ids;
mod project;
mod status;

pub use error::{ParseProjectStatusError, ProjectDomainError};
pub use filter::{ProjectFilter, ProjectScope};
pub use ids::ProjectId;
pub use project::{
    NewProject, PersistedProjectData, Project, ProjectChanges, ProjectUpdateOutcome,
    RISK_THRESHOLD,
};
pub use status::ProjectStatus;
