//! Port contracts for the message ledger.

pub mod ledger;

pub use ledger::MessageLedger;
