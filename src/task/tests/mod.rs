//! Unit tests for the task module.
//!
//! Tests are organised by layer: domain normalization and derived fields,
//! scope and filter predicates, the in-memory repository adapter, and the
//! orchestration service.

mod adapters_tests;
mod domain_tests;
mod service_tests;
