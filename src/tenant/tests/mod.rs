//! Unit tests for tenancy and authorization.
