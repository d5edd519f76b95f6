//! Cross-table transaction port.

use super::StoreResult;
use crate::conversation::domain::{Conversation, ConversationStatus, ThreadId, TransitionOutcome};
use crate::conversation::ports::ConversationRepository;
use crate::message::domain::{Message, NewMessage};
use crate::message::ports::MessageLedger;
use crate::session::ports::ContactSessionRepository;
use async_trait::async_trait;

/// A status request plus the confirmation appended when it is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Requested status.
    pub target: ConversationStatus,
    /// Entry appended after the staged entries unless the request is
    /// ignored.
    pub confirmation: Option<NewMessage>,
}

/// One atomic unit of work against a thread.
///
/// Staged entries are appended first, in order, followed by the confirmation
/// of the status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadCommit {
    thread_id: ThreadId,
    entries: Vec<NewMessage>,
    status_change: Option<StatusChange>,
    require_open: bool,
}

impl ThreadCommit {
    /// Starts an empty commit for the thread.
    #[must_use]
    pub const fn new(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            entries: Vec::new(),
            status_change: None,
            require_open: false,
        }
    }

    /// Adds entries to append.
    #[must_use]
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = NewMessage>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Requests a status change without a confirmation entry.
    #[must_use]
    pub fn with_status(mut self, target: ConversationStatus) -> Self {
        self.status_change = Some(StatusChange {
            target,
            confirmation: None,
        });
        self
    }

    /// Requests a status change confirmed by a ledger entry.
    #[must_use]
    pub fn with_confirmed_status(
        mut self,
        target: ConversationStatus,
        confirmation: NewMessage,
    ) -> Self {
        self.status_change = Some(StatusChange {
            target,
            confirmation: Some(confirmation),
        });
        self
    }

    /// Rejects the whole commit when the conversation is resolved at commit
    /// time.
    #[must_use]
    pub const fn if_open(mut self) -> Self {
        self.require_open = true;
        self
    }

    /// Returns `true` when the commit only applies to an open conversation.
    #[must_use]
    pub const fn requires_open(&self) -> bool {
        self.require_open
    }

    /// Returns the target thread.
    #[must_use]
    pub const fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Splits the commit into its parts.
    #[must_use]
    pub fn into_parts(self) -> (ThreadId, Vec<NewMessage>, Option<StatusChange>) {
        (self.thread_id, self.entries, self.status_change)
    }
}

/// Result of a committed [`ThreadCommit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// The conversation as stored after the commit.
    pub conversation: Conversation,
    /// Outcome of the status request, if one was made.
    pub transition: Option<TransitionOutcome>,
    /// Entries appended by the commit, in ledger order.
    pub appended: Vec<Message>,
}

/// Applies status changes and ledger appends atomically.
#[async_trait]
pub trait ThreadTransactions: Send + Sync {
    /// Commits the unit of work.
    ///
    /// Readers observe either none or all of its effects.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::ThreadNotFound`] when no conversation owns
    /// the thread, or [`super::StoreError::ThreadClosed`] when the commit
    /// requires an open conversation and it is resolved.
    async fn commit_thread(&self, commit: ThreadCommit) -> StoreResult<CommitReceipt>;
}

/// Everything the conversation and agent services need from one backend.
pub trait SupportStore:
    ContactSessionRepository + ConversationRepository + MessageLedger + ThreadTransactions
{
}

impl<T> SupportStore for T where
    T: ContactSessionRepository + ConversationRepository + MessageLedger + ThreadTransactions
{
}
