//! Shared transactional store.
//!
//! Every public operation runs as one transaction against the store. The
//! per-context repository ports are implemented by a single backend so a
//! status transition and the ledger entries that accompany it can commit as
//! one unit through [`ThreadTransactions`].

mod error;
mod memory;
mod ports;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use ports::{CommitReceipt, StatusChange, SupportStore, ThreadCommit, ThreadTransactions};

pub(crate) use memory::StoreState;

#[cfg(test)]
mod tests;
