//! Unit tests for plugin connections.
