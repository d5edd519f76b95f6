//! Append-only message ledger.
//!
//! Every conversation thread is an ordered sequence of [`domain::Message`]
//! entries. Entries are never edited or removed; reads page through them with
//! opaque cursors.
//!
//! - Domain types in [`domain`]
//! - The ledger port in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Visitor and operator access in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
