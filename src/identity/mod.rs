//! User identity and role management.
//!
//! Provides the shared identity vocabulary consumed by the rest of the
//! crate: user records, the closed role set, and the per-request [`Actor`]
//! snapshot the policy engine decides over. It also hosts admin-only user
//! management and invitation delivery. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//!
//! [`Actor`]: domain::Actor

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
