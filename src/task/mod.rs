//! Task lifecycle management.
//!
//! Covers task creation and partial update with payload normalization
//! (hours-to-minutes conversion, completion-timestamp derivation, default
//! assignee), user-assignment sync with newly-added detection, soft
//! deletion, and actor-scoped listing. The module follows hexagonal
//! architecture:
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
