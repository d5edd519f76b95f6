//! Adapter implementations for the message ledger.

pub mod memory;
