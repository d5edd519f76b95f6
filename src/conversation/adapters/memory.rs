//! [`ConversationRepository`] for the in-memory store.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::conversation::{
    domain::{Conversation, ConversationId, ThreadId},
    ports::{ConversationRepository, ConversationScope},
};
use crate::message::domain::{Message, NewMessage};
use crate::pagination::{Page, PageRequest, paginate};
use crate::store::{InMemoryStore, StoreError, StoreResult};

#[async_trait]
impl ConversationRepository for InMemoryStore {
    async fn insert_conversation(
        &self,
        conversation: &Conversation,
        opening: Vec<NewMessage>,
    ) -> StoreResult<Vec<Message>> {
        let mut state = self.write()?;
        if state.conversations.contains_key(&conversation.id()) {
            return Err(StoreError::DuplicateConversation(conversation.id()));
        }
        if state.by_thread.contains_key(&conversation.thread_id())
            || state.threads.contains_key(&conversation.thread_id())
        {
            return Err(StoreError::DuplicateThread(conversation.thread_id()));
        }

        let position = state.next_position;
        state.next_position = position.saturating_add(1);

        let id = conversation.id();
        let organization_id = conversation.organization_id().clone();
        state.positions.insert(id, position);
        state.by_thread.insert(conversation.thread_id(), id);
        state
            .by_organization
            .entry(organization_id.clone())
            .or_default()
            .insert(position, id);
        state
            .by_status_and_organization
            .entry((conversation.status(), organization_id))
            .or_default()
            .insert(position, id);
        state
            .by_contact_session
            .entry(conversation.contact_session_id())
            .or_default()
            .insert(position, id);
        state.conversations.insert(id, conversation.clone());
        state.threads.insert(conversation.thread_id(), BTreeMap::new());

        state.append_entries(conversation.thread_id(), opening)
    }

    async fn find_conversation(&self, id: ConversationId) -> StoreResult<Option<Conversation>> {
        let state = self.read()?;
        Ok(state.conversations.get(&id).cloned())
    }

    async fn find_conversation_by_thread(
        &self,
        thread_id: ThreadId,
    ) -> StoreResult<Option<Conversation>> {
        let state = self.read()?;
        Ok(state
            .by_thread
            .get(&thread_id)
            .and_then(|id| state.conversations.get(id))
            .cloned())
    }

    async fn list_conversations(
        &self,
        scope: &ConversationScope,
        request: &PageRequest,
    ) -> StoreResult<Page<Conversation>> {
        let state = self.read()?;
        let index = match scope {
            ConversationScope::Organization {
                organization_id,
                status: Some(status),
            } => state
                .by_status_and_organization
                .get(&(*status, organization_id.clone())),
            ConversationScope::Organization {
                organization_id,
                status: None,
            } => state.by_organization.get(organization_id),
            ConversationScope::ContactSession(contact_session_id) => {
                state.by_contact_session.get(contact_session_id)
            }
        };

        Ok(index.map_or_else(Page::empty, |positions| {
            paginate(positions, request, |id| state.conversations.get(id).cloned())
        }))
    }
}
