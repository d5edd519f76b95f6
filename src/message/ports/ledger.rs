//! Ledger port for thread message persistence.

use crate::conversation::domain::ThreadId;
use crate::message::domain::{Message, NewMessage};
use crate::pagination::{Page, PageRequest};
use crate::store::StoreResult;
use async_trait::async_trait;

/// Append-only message ledger.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Sequence numbers are consecutive within a thread, starting at 1
/// - Entries are immutable after append (no update or delete operations)
/// - A batch appended in one call is visible to readers all at once
#[async_trait]
pub trait MessageLedger: Send + Sync {
    /// Appends entries to a thread in order.
    ///
    /// Returns the recorded entries.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::ThreadNotFound`] when the thread
    /// does not exist.
    async fn append_messages(
        &self,
        thread_id: ThreadId,
        entries: Vec<NewMessage>,
    ) -> StoreResult<Vec<Message>>;

    /// Returns one page of a thread's entries.
    ///
    /// An unknown thread yields an empty page.
    async fn list_messages(
        &self,
        thread_id: ThreadId,
        request: &PageRequest,
    ) -> StoreResult<Page<Message>>;

    /// Returns the most recent entry of a thread.
    async fn last_message(&self, thread_id: ThreadId) -> StoreResult<Option<Message>> {
        let page = self
            .list_messages(thread_id, &PageRequest::newest_first(1))
            .await?;
        Ok(page.items.into_iter().next())
    }
}
