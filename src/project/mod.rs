//! Project lifecycle management.
//!
//! Covers project creation and partial update, user-assignment sync with
//! newly-added detection, soft deletion, actor-scoped listing, and the
//! at-risk transition that feeds notification dispatch. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
