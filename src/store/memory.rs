//! In-memory store backing every repository port.
//!
//! Thread-safe via one [`RwLock`] over all tables, so each trait method is a
//! serializable transaction. Suitable for tests and single-process wiring.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CommitReceipt, StoreError, StoreResult, ThreadCommit, ThreadTransactions};
use crate::conversation::domain::{
    Conversation, ConversationId, ConversationStatus, ThreadId, TransitionOutcome,
};
use crate::message::domain::{Message, NewMessage, SequenceNumber};
use crate::plugin::domain::{PluginRecord, PluginService};
use crate::session::domain::{ContactSession, ContactSessionId};
use crate::tenant::domain::OrganizationId;

/// Position-ordered index of conversation identifiers.
pub(crate) type PositionIndex = BTreeMap<u64, ConversationId>;

/// Tables and secondary indexes.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) sessions: HashMap<ContactSessionId, ContactSession>,
    pub(crate) sessions_by_expiry: BTreeSet<(DateTime<Utc>, ContactSessionId)>,
    pub(crate) conversations: HashMap<ConversationId, Conversation>,
    pub(crate) positions: HashMap<ConversationId, u64>,
    pub(crate) by_thread: HashMap<ThreadId, ConversationId>,
    pub(crate) by_organization: HashMap<OrganizationId, PositionIndex>,
    pub(crate) by_status_and_organization:
        HashMap<(ConversationStatus, OrganizationId), PositionIndex>,
    pub(crate) by_contact_session: HashMap<ContactSessionId, PositionIndex>,
    pub(crate) next_position: u64,
    pub(crate) threads: HashMap<ThreadId, BTreeMap<u64, Message>>,
    pub(crate) plugins: HashMap<(OrganizationId, PluginService), PluginRecord>,
}

impl StoreState {
    /// Appends entries to a thread, assigning consecutive sequence numbers.
    pub(crate) fn append_entries(
        &mut self,
        thread_id: ThreadId,
        entries: Vec<NewMessage>,
    ) -> StoreResult<Vec<Message>> {
        let thread = self
            .threads
            .get_mut(&thread_id)
            .ok_or(StoreError::ThreadNotFound(thread_id))?;
        let mut sequence = thread
            .last_key_value()
            .map_or(SequenceNumber::FIRST, |(last, _)| {
                SequenceNumber::new(*last).next()
            });

        let mut appended = Vec::with_capacity(entries.len());
        for entry in entries {
            let message = entry.record(thread_id, sequence);
            thread.insert(sequence.value(), message.clone());
            appended.push(message);
            sequence = sequence.next();
        }
        Ok(appended)
    }

    /// Applies a status request to the conversation owning the thread and
    /// keeps the status index in step.
    pub(crate) fn apply_status(
        &mut self,
        thread_id: ThreadId,
        target: ConversationStatus,
    ) -> StoreResult<(Conversation, TransitionOutcome)> {
        let conversation_id = *self
            .by_thread
            .get(&thread_id)
            .ok_or(StoreError::ThreadNotFound(thread_id))?;
        let position = self
            .positions
            .get(&conversation_id)
            .copied()
            .ok_or(StoreError::ThreadNotFound(thread_id))?;
        let conversation = self
            .conversations
            .get_mut(&conversation_id)
            .ok_or(StoreError::ThreadNotFound(thread_id))?;

        let outcome = conversation.apply_status(target);
        if let TransitionOutcome::Applied { from } = outcome {
            let organization_id = conversation.organization_id().clone();
            if let Some(index) = self
                .by_status_and_organization
                .get_mut(&(from, organization_id.clone()))
            {
                index.remove(&position);
            }
            self.by_status_and_organization
                .entry((target, organization_id))
                .or_default()
                .insert(position, conversation_id);
        }
        Ok((conversation.clone(), outcome))
    }
}

/// Thread-safe in-memory implementation of every store port.
///
/// # Example
///
/// ```
/// use switchboard::store::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// assert_eq!(store.session_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored contact sessions.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.state
            .read()
            .map(|state| state.sessions.len())
            .unwrap_or(0)
    }

    pub(crate) fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    pub(crate) fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl ThreadTransactions for InMemoryStore {
    async fn commit_thread(&self, commit: ThreadCommit) -> StoreResult<CommitReceipt> {
        let mut state = self.write()?;
        let require_open = commit.requires_open();
        let (thread_id, entries, status_change) = commit.into_parts();
        let current = state
            .by_thread
            .get(&thread_id)
            .and_then(|id| state.conversations.get(id))
            .map(Conversation::status)
            .ok_or(StoreError::ThreadNotFound(thread_id))?;
        if require_open && !current.accepts_messages() {
            return Err(StoreError::ThreadClosed(thread_id));
        }

        let (conversation, transition, confirmation) = match status_change {
            Some(change) => {
                let (conversation, outcome) = state.apply_status(thread_id, change.target)?;
                let confirmation = change.confirmation.filter(|_| outcome.is_accepted());
                (conversation, Some(outcome), confirmation)
            }
            None => {
                let conversation = state
                    .by_thread
                    .get(&thread_id)
                    .and_then(|id| state.conversations.get(id))
                    .cloned()
                    .ok_or(StoreError::ThreadNotFound(thread_id))?;
                (conversation, None, None)
            }
        };

        let mut staged = entries;
        staged.extend(confirmation);
        let appended = state.append_entries(thread_id, staged)?;

        Ok(CommitReceipt {
            conversation,
            transition,
            appended,
        })
    }
}
