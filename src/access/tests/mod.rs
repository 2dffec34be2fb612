//! Unit tests for the policy engine.
//!
//! Rule tables are exercised per resource kind, covering the admin
//! override, the self-delete guard, and the involvement-based read rules.

mod decision_tests;
