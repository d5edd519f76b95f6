//! Result of a visitor turn.

use super::{ToolCall, ToolOutcome};
use crate::conversation::domain::ConversationStatus;
use crate::message::domain::Message;

/// A tool call and what came of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// The call as requested.
    pub call: ToolCall,
    /// Its outcome.
    pub outcome: ToolOutcome,
}

/// What a visitor prompt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Conversation status once the turn finished.
    pub status: ConversationStatus,
    /// Whether the automated agent answered.
    pub agent_ran: bool,
    /// Ledger entries committed by the turn, in ledger order.
    pub messages: Vec<Message>,
    /// Tool calls executed during the turn, in order.
    pub tool_invocations: Vec<ToolInvocation>,
}
