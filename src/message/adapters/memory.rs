//! [`MessageLedger`] for the in-memory store.

use async_trait::async_trait;

use crate::conversation::domain::ThreadId;
use crate::message::{
    domain::{Message, NewMessage},
    ports::MessageLedger,
};
use crate::pagination::{Page, PageRequest, paginate};
use crate::store::{InMemoryStore, StoreResult};

#[async_trait]
impl MessageLedger for InMemoryStore {
    async fn append_messages(
        &self,
        thread_id: ThreadId,
        entries: Vec<NewMessage>,
    ) -> StoreResult<Vec<Message>> {
        let mut state = self.write()?;
        state.append_entries(thread_id, entries)
    }

    async fn list_messages(
        &self,
        thread_id: ThreadId,
        request: &PageRequest,
    ) -> StoreResult<Page<Message>> {
        let state = self.read()?;
        Ok(state.threads.get(&thread_id).map_or_else(Page::empty, |thread| {
            paginate(thread, request, |message| Some(message.clone()))
        }))
    }
}
