//! Domain types for the message ledger.
//!
//! All types are immutable after construction and serialisable via serde.

mod author;
mod ids;
mod message;
mod role;

pub use author::MessageAuthor;
pub use ids::{MessageId, SequenceNumber};
pub use message::{Message, NewMessage};
pub use role::{ParseRoleError, Role};
