//! Unit tests for the shared store.
