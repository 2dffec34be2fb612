//! Unit tests for the project module.
//!
//! Tests are organised by layer: domain validation and derived fields,
//! scope and filter predicates, the in-memory repository adapter, and the
//! orchestration service.
