//! Adapter implementations for plugin records and the secret vault.

pub mod memory;
