//! Domain model for users and roles.

mod error;
mod ids;
mod role;
mod user;

pub use error::{IdentityDomainError, ParseUserRoleError};
pub use ids::UserId;
pub use role::{Actor, UserRole};
pub use user::{NewUser, PersistedUserData, User, UserChanges};
