//! Conversation reads for operators and visitors.

use super::ConversationService;
use crate::conversation::domain::{
    Conversation, ConversationDetails, ConversationId, ConversationStatus, ConversationSummary,
};
use crate::conversation::ports::ConversationScope;
use crate::error::{SupportError, SupportResult};
use crate::pagination::{Page, PageRequest};
use crate::session::domain::ContactSessionId;
use crate::store::SupportStore;
use crate::tenant::domain::OperatorIdentity;
use crate::tenant::services::{ensure_visitor_access, operator_scope};
use mockable::Clock;

impl<S, C> ConversationService<S, C>
where
    S: SupportStore,
    C: Clock + Send + Sync,
{
    /// Returns a conversation of the operator's organization with its
    /// contact session.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NotFound`] when the conversation or its
    /// session is missing, or [`SupportError::Unauthorized`] when the
    /// conversation belongs to another organization.
    pub async fn get_for_operator(
        &self,
        identity: &OperatorIdentity,
        conversation_id: ConversationId,
    ) -> SupportResult<ConversationDetails> {
        let conversation = self.operator_conversation(identity, conversation_id).await?;
        let contact_session = self
            .store
            .find_session(conversation.contact_session_id())
            .await?
            .ok_or_else(|| SupportError::not_found("contact session not found"))?;
        Ok(ConversationDetails {
            conversation,
            contact_session,
        })
    }

    /// Lists the operator's organization's conversations, newest first.
    ///
    /// Rows whose contact session no longer exists are left out of the page.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the identity has no
    /// organization.
    pub async fn list_for_operator(
        &self,
        identity: &OperatorIdentity,
        status: Option<ConversationStatus>,
        request: &PageRequest,
    ) -> SupportResult<Page<ConversationSummary>> {
        let scope = ConversationScope::Organization {
            organization_id: operator_scope(identity)?.clone(),
            status,
        };
        let page = self.store.list_conversations(&scope, request).await?;
        self.summarize(page).await
    }

    /// Returns one of the visitor's own conversations.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the session is invalid or
    /// did not open the conversation, or [`SupportError::NotFound`] when the
    /// conversation does not exist.
    pub async fn get_for_visitor(
        &self,
        contact_session_id: ContactSessionId,
        conversation_id: ConversationId,
    ) -> SupportResult<Conversation> {
        let session = self.guard.authorize_visitor(contact_session_id).await?;
        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| SupportError::not_found("conversation not found"))?;
        ensure_visitor_access(&session, &conversation)?;
        Ok(conversation)
    }

    /// Lists the conversations opened from the visitor's session, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the session is invalid.
    pub async fn list_for_visitor(
        &self,
        contact_session_id: ContactSessionId,
        request: &PageRequest,
    ) -> SupportResult<Page<ConversationSummary>> {
        let session = self.guard.authorize_visitor(contact_session_id).await?;
        let scope = ConversationScope::ContactSession(session.id());
        let page = self.store.list_conversations(&scope, request).await?;
        self.summarize(page).await
    }

    async fn summarize(
        &self,
        page: Page<Conversation>,
    ) -> SupportResult<Page<ConversationSummary>> {
        let mut rows = Vec::with_capacity(page.items.len());
        for conversation in &page.items {
            let Some(contact_session) = self
                .store
                .find_session(conversation.contact_session_id())
                .await?
            else {
                tracing::warn!(
                    conversation_id = %conversation.id(),
                    contact_session_id = %conversation.contact_session_id(),
                    "dropping conversation whose contact session is missing"
                );
                continue;
            };
            let last_message = self.store.last_message(conversation.thread_id()).await?;
            rows.push(ConversationSummary {
                conversation: conversation.clone(),
                contact_session,
                last_message,
            });
        }
        Ok(page.with_items(rows))
    }
}
