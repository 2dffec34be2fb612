//! Unit tests for the identity module.
//!
//! Tests are organised by layer: domain validation, the in-memory
//! repository adapter, and the user directory service.

mod domain_tests;
