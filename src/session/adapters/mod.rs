//! Adapter implementations for contact session persistence.

pub mod memory;
