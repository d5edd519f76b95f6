//! Port contracts for conversation persistence.

pub mod repository;

pub use repository::{ConversationRepository, ConversationScope};
