//! Domain model for support conversations.

mod conversation;
mod error;
mod ids;
mod status;

pub use conversation::{Conversation, ConversationDetails, ConversationSummary};
pub use error::ParseConversationStatusError;
pub use ids::{ConversationId, ThreadId};
pub use status::{ConversationStatus, TransitionOutcome};
