//! Chantier: project and task management core.
//!
//! This crate provides the decision and rule layer of a project/task
//! management backend: role-based authorization, domain rules for status
//! transitions and derived fields, and event-driven notification dispatch.
//! HTTP routing, request shape validation, and storage engines are external
//! collaborators that call into this core through the service operations.
//!
//! # Architecture
//!
//! Chantier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory reference
//!   adapters; durable stores plug in behind the same traits)
//!
//! # Modules
//!
//! - [`identity`]: Users, roles, and invitations
//! - [`access`]: Policy engine deciding who may act on which resource
//! - [`project`]: Project aggregate, scoped listing, risk transitions
//! - [`task`]: Task aggregate, payload normalization, completion rules
//! - [`notification`]: Recipient selection, templates, and dispatch
//! - [`paging`]: Bounded pagination shared by list operations

pub mod access;
pub mod identity;
pub mod notification;
pub mod paging;
pub mod project;
pub mod task;
