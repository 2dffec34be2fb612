//! In-memory adapters for the project context.

mod project;

pub use project::InMemoryProjectRepository;
