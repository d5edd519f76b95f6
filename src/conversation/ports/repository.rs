//! Repository port for conversations.

use crate::conversation::domain::{Conversation, ConversationId, ConversationStatus, ThreadId};
use crate::message::domain::{Message, NewMessage};
use crate::pagination::{Page, PageRequest};
use crate::session::domain::ContactSessionId;
use crate::store::StoreResult;
use crate::tenant::domain::OrganizationId;
use async_trait::async_trait;

/// Which conversations a listing walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationScope {
    /// An organization's conversations, optionally narrowed to one status.
    Organization {
        /// Owning organization.
        organization_id: OrganizationId,
        /// Status filter.
        status: Option<ConversationStatus>,
    },
    /// Conversations opened from one visitor session.
    ContactSession(ContactSessionId),
}

/// Conversation persistence contract.
///
/// Listings are ordered by insertion position, so newest-first pages follow
/// creation order and stay stable when conversations are added.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Stores a new conversation, creates its empty thread and appends the
    /// opening entries, all in one transaction.
    ///
    /// Returns the appended entries.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::DuplicateConversation`] or
    /// [`crate::store::StoreError::DuplicateThread`] when an identifier is
    /// already taken.
    async fn insert_conversation(
        &self,
        conversation: &Conversation,
        opening: Vec<NewMessage>,
    ) -> StoreResult<Vec<Message>>;

    /// Finds a conversation by identifier.
    async fn find_conversation(&self, id: ConversationId) -> StoreResult<Option<Conversation>>;

    /// Finds the conversation owning a thread.
    async fn find_conversation_by_thread(
        &self,
        thread_id: ThreadId,
    ) -> StoreResult<Option<Conversation>>;

    /// Returns one page of conversations in the scope.
    async fn list_conversations(
        &self,
        scope: &ConversationScope,
        request: &PageRequest,
    ) -> StoreResult<Page<Conversation>>;
}
