//! Requests to and responses from the generation engine.

use super::{ToolCall, ToolSpec};
use crate::message::domain::Message;
use serde::{Deserialize, Serialize};

/// One entry of the in-flight exchange for the current turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Exchange {
    /// The visitor prompt that started the turn.
    Prompt {
        /// Prompt text.
        text: String,
    },
    /// A step previously returned by the engine.
    Reply {
        /// The step.
        step: GenerationStep,
    },
    /// The result of a tool call from a previous step.
    ToolResult {
        /// Call identifier.
        call_id: String,
        /// Tool name.
        tool: String,
        /// Text given back to the engine.
        output: String,
    },
}

/// Input for one generation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System instructions.
    pub instructions: String,
    /// Recent committed ledger entries, oldest first.
    pub history: Vec<Message>,
    /// This turn's prompt, replies and tool results, in order.
    pub exchanges: Vec<Exchange>,
    /// Tools the engine may call.
    pub tools: Vec<ToolSpec>,
}

/// One step produced by the engine: text, tool calls or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStep {
    /// Reply text; may be empty when only tools are called.
    #[serde(default)]
    pub text: String,
    /// Requested tool calls, executed in order.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl GenerationStep {
    /// Creates a final text-only step.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Adds a tool call.
    #[must_use]
    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }
}

/// A single-shot completion without tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System instructions.
    pub system: String,
    /// User prompt.
    pub prompt: String,
}
