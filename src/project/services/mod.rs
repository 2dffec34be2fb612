//! Orchestration services for the project context.

mod service;

pub use service::{ProjectService, ProjectServiceError, ProjectServiceResult};
