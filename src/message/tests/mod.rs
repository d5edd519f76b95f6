//! Unit tests for the message ledger.
