//! Error types for conversation parsing.

use thiserror::Error;

/// Error returned while parsing a conversation status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown conversation status: {0}")]
pub struct ParseConversationStatusError(pub String);
