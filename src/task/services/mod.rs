//! Orchestration services for the task context.

mod service;

pub use service::{TaskService, TaskServiceError, TaskServiceResult};
