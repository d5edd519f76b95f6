//! Unit tests for contact sessions.

mod domain_tests;
mod service_tests;
