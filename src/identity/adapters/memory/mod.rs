//! In-memory adapters for the identity context.

mod user;

pub use user::InMemoryUserRepository;
