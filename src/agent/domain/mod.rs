//! Domain types for the support agent.

mod generation;
mod knowledge;
mod tool;
mod turn;

pub use generation::{CompletionRequest, Exchange, GenerationRequest, GenerationStep};
pub use knowledge::{KnowledgeNamespace, SearchEntry, SearchResults};
pub use tool::{SearchArguments, SupportToolCall, ToolCall, ToolError, ToolOutcome, ToolSpec};
pub use turn::{ToolInvocation, TurnOutcome};
