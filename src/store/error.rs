//! Errors returned by store implementations.

use crate::conversation::domain::{ConversationId, ThreadId};
use crate::session::domain::ContactSessionId;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A contact session with the same identifier already exists.
    #[error("duplicate contact session: {0}")]
    DuplicateSession(ContactSessionId),

    /// The contact session does not exist.
    #[error("contact session not found: {0}")]
    SessionNotFound(ContactSessionId),

    /// A conversation with the same identifier already exists.
    #[error("duplicate conversation: {0}")]
    DuplicateConversation(ConversationId),

    /// A conversation already owns the thread identifier.
    #[error("duplicate thread: {0}")]
    DuplicateThread(ThreadId),

    /// No conversation owns the thread identifier.
    #[error("thread not found: {0}")]
    ThreadNotFound(ThreadId),

    /// The conversation owning the thread no longer accepts messages.
    #[error("thread closed: {0}")]
    ThreadClosed(ThreadId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
