//! Adapter implementations for conversation persistence.

pub mod memory;
