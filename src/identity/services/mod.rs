//! Orchestration services for the identity context.

mod directory;

pub use directory::{
    DEFAULT_INVITATION_URL, UserDirectoryError, UserDirectoryResult, UserDirectoryService,
};
