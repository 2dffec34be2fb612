//! Notification recipient selection, rendering, and dispatch.
//!
//! Maps domain events to recipient sets and requests delivery exactly once
//! per qualifying recipient per dispatch call. Delivery itself is behind
//! the [`ports::NotificationChannel`] port and is best-effort: failures are
//! logged, never propagated to the calling transaction. The module follows
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
