//! Application services for conversations.

mod lifecycle;
mod listing;

pub use lifecycle::{ConversationService, StatusUpdate};

pub(crate) use lifecycle::{log_transition, thread_error};
