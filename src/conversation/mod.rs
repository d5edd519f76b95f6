//! Support conversations and their status state machine.
//!
//! A conversation links a contact session to a message thread. Its status
//! only ever moves forward:
//!
//! ```text
//! unresolved ──► escalated ──► resolved
//!      └───────────────────────────▲
//! ```
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Operator and visitor services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
