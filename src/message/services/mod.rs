//! Application services for the message ledger.

mod ledger;

pub use ledger::MessageLedgerService;
