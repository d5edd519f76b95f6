//! Unit tests for conversations.
