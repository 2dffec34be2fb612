//! Unit tests for the notification module.
//!
//! Covers template rendering, dispatcher deduplication and best-effort
//! delivery, and the two scheduled sweeps.

mod sweep_tests;
