//! Port contracts for the identity context.

mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
