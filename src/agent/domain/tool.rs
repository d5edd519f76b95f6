//! Tool specifications, calls and outcomes.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

/// Metadata for a tool offered to the generation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    name: String,
    description: String,
    input_schema: Value,
}

impl ToolSpec {
    /// Name of the tool that resolves the conversation.
    pub const RESOLVE_CONVERSATION: &'static str = "resolveConversation";
    /// Name of the tool that escalates the conversation.
    pub const ESCALATE_CONVERSATION: &'static str = "escalateConversation";
    /// Name of the knowledge search tool.
    pub const SEARCH: &'static str = "search";

    /// Creates a tool specification.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Returns the three support tools.
    #[must_use]
    pub fn support_tools() -> Vec<Self> {
        let no_arguments = json!({ "type": "object", "properties": {} });
        vec![
            Self::new(
                Self::RESOLVE_CONVERSATION,
                "Resolve conversation",
                no_arguments.clone(),
            ),
            Self::new(
                Self::ESCALATE_CONVERSATION,
                "Escalate conversation",
                no_arguments,
            ),
            Self::new(
                Self::SEARCH,
                "Search the knowledge base for relevant information to help answer user questions",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The search query to find relevant information"
                        }
                    },
                    "required": ["query"]
                }),
            ),
        ]
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the JSON schema of the arguments.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

/// A tool invocation requested by the generation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Engine-assigned call identifier, echoed with the result.
    pub id: String,
    /// Requested tool name.
    pub name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Creates a tool call.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Arguments of the search tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchArguments {
    /// The search query.
    pub query: String,
}

/// A tool call parsed into one of the support tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportToolCall {
    /// Mark the conversation resolved.
    ResolveConversation,
    /// Hand the conversation to human operators.
    EscalateConversation,
    /// Answer from the organization's knowledge base.
    Search(SearchArguments),
}

impl TryFrom<&ToolCall> for SupportToolCall {
    type Error = ToolError;

    fn try_from(call: &ToolCall) -> Result<Self, Self::Error> {
        match call.name.as_str() {
            ToolSpec::RESOLVE_CONVERSATION => Ok(Self::ResolveConversation),
            ToolSpec::ESCALATE_CONVERSATION => Ok(Self::EscalateConversation),
            ToolSpec::SEARCH => serde_json::from_value(call.arguments.clone())
                .map(Self::Search)
                .map_err(|err| ToolError::InvalidArguments {
                    tool: call.name.clone(),
                    reason: err.to_string(),
                }),
            other => Err(ToolError::UnknownTool(other.to_owned())),
        }
    }
}

/// Tool failures reported back to the engine as text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    /// The toolbox is not bound to a thread.
    #[error("Missing thread ID")]
    MissingThread,

    /// No conversation owns the bound thread.
    #[error("Conversation not found")]
    ConversationNotFound,

    /// Retrieval or synthesis failed.
    #[error("Error searching knowledge base: {0}")]
    SearchFailed(String),

    /// The status change could not be committed.
    #[error("Error updating conversation: {0}")]
    UpdateFailed(String),

    /// The engine asked for a tool that does not exist.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not match the tool's schema.
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// Parse failure.
        reason: String,
    },
}

/// Result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The tool ran and produced text for the engine.
    Completed(String),
    /// The tool failed; the error text is given to the engine.
    Failed(ToolError),
}

impl ToolOutcome {
    /// Returns `true` for [`ToolOutcome::Completed`].
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

impl fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(text) => f.write_str(text),
            Self::Failed(err) => write!(f, "{err}"),
        }
    }
}

impl From<Result<String, ToolError>> for ToolOutcome {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(text) => Self::Completed(text),
            Err(err) => Self::Failed(err),
        }
    }
}
