//! Authorized access to thread ledgers.
//!
//! Visitors read the threads of conversations opened from their session.
//! Operators read every thread of their organization and may reply to
//! conversations that are not resolved. Visitor writes go through the agent
//! orchestrator instead.

use std::sync::Arc;

use mockable::Clock;

use crate::conversation::domain::{Conversation, ConversationId, ThreadId};
use crate::conversation::services::thread_error;
use crate::error::{SupportError, SupportResult};
use crate::message::domain::{Message, NewMessage};
use crate::pagination::{Page, PageRequest};
use crate::session::domain::ContactSessionId;
use crate::store::{SupportStore, ThreadCommit};
use crate::tenant::domain::OperatorIdentity;
use crate::tenant::services::{
    AuthorizationGuard, ensure_operator_access, ensure_visitor_access, operator_scope,
};

/// Service for reading and writing thread ledgers on behalf of callers.
pub struct MessageLedgerService<S, C>
where
    S: SupportStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    guard: AuthorizationGuard<S, C>,
}

impl<S, C> Clone for MessageLedgerService<S, C>
where
    S: SupportStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            guard: self.guard.clone(),
        }
    }
}

impl<S, C> MessageLedgerService<S, C>
where
    S: SupportStore,
    C: Clock + Send + Sync,
{
    /// Creates a new ledger service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let guard = AuthorizationGuard::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            store,
            clock,
            guard,
        }
    }

    /// Returns a page of a thread the visitor's session owns.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the session is invalid or
    /// does not own the thread, or [`SupportError::NotFound`] when no
    /// conversation owns the thread.
    pub async fn list_for_visitor(
        &self,
        contact_session_id: ContactSessionId,
        thread_id: ThreadId,
        request: &PageRequest,
    ) -> SupportResult<Page<Message>> {
        let session = self.guard.authorize_visitor(contact_session_id).await?;
        let conversation = self.conversation_by_thread(thread_id).await?;
        ensure_visitor_access(&session, &conversation)?;
        Ok(self.store.list_messages(thread_id, request).await?)
    }

    /// Returns a page of a thread in the operator's organization.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the identity has no
    /// organization or the thread belongs to another one, or
    /// [`SupportError::NotFound`] when no conversation owns the thread.
    pub async fn list_for_operator(
        &self,
        identity: &OperatorIdentity,
        thread_id: ThreadId,
        request: &PageRequest,
    ) -> SupportResult<Page<Message>> {
        operator_scope(identity)?;
        let conversation = self.conversation_by_thread(thread_id).await?;
        ensure_operator_access(identity, &conversation)?;
        Ok(self.store.list_messages(thread_id, request).await?)
    }

    /// Appends an operator reply, shown on the support side and attributed to
    /// the operator.
    ///
    /// The agent does not run for operator replies.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NotFound`] when the conversation does not
    /// exist, [`SupportError::Unauthorized`] when it belongs to another
    /// organization, or [`SupportError::BadRequest`] when it is resolved or
    /// the reply is blank.
    pub async fn reply_as_operator(
        &self,
        identity: &OperatorIdentity,
        conversation_id: ConversationId,
        content: &str,
    ) -> SupportResult<Message> {
        operator_scope(identity)?;
        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| SupportError::not_found("conversation not found"))?;
        ensure_operator_access(identity, &conversation)?;
        if !conversation.status().accepts_messages() {
            return Err(SupportError::bad_request("conversation resolved"));
        }
        if content.trim().is_empty() {
            return Err(SupportError::bad_request("message must not be empty"));
        }

        let reply = NewMessage::operator(identity, content, &*self.clock);
        let receipt = self
            .store
            .commit_thread(
                ThreadCommit::new(conversation.thread_id())
                    .with_entries([reply])
                    .if_open(),
            )
            .await
            .map_err(thread_error)?;
        receipt
            .appended
            .into_iter()
            .next()
            .ok_or_else(|| SupportError::service(std::io::Error::other("reply was not recorded")))
    }

    async fn conversation_by_thread(&self, thread_id: ThreadId) -> SupportResult<Conversation> {
        self.store
            .find_conversation_by_thread(thread_id)
            .await?
            .ok_or_else(|| SupportError::not_found("conversation not found"))
    }
}
