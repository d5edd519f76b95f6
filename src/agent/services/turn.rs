//! Entries staged during one visitor turn.

use crate::conversation::domain::{ConversationStatus, ThreadId, TransitionOutcome};
use crate::message::domain::{Message, NewMessage};
use crate::store::{CommitReceipt, StoreResult, ThreadCommit, ThreadTransactions};

/// Accumulates a turn's ledger entries until they can be committed.
///
/// The visitor prompt is staged first and leaves together with the first
/// assistant entry or status change, so readers never observe a reply
/// without its prompt. The first commit only succeeds while the
/// conversation is not resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnLedger {
    thread_id: Option<ThreadId>,
    status: ConversationStatus,
    staged: Vec<NewMessage>,
    committed: Vec<Message>,
    last_transition: Option<TransitionOutcome>,
    opening: bool,
}

impl TurnLedger {
    /// Starts a turn on a thread whose conversation has `status`.
    #[must_use]
    pub const fn bound(thread_id: ThreadId, status: ConversationStatus) -> Self {
        Self {
            thread_id: Some(thread_id),
            status,
            staged: Vec::new(),
            committed: Vec::new(),
            last_transition: None,
            opening: true,
        }
    }

    /// Starts a turn with no thread; tools that need one fail.
    #[must_use]
    pub const fn unbound() -> Self {
        Self {
            thread_id: None,
            status: ConversationStatus::Unresolved,
            staged: Vec::new(),
            committed: Vec::new(),
            last_transition: None,
            opening: true,
        }
    }

    /// Returns the bound thread.
    #[must_use]
    pub const fn thread_id(&self) -> Option<ThreadId> {
        self.thread_id
    }

    /// Returns the conversation status last observed by the turn.
    #[must_use]
    pub const fn status(&self) -> ConversationStatus {
        self.status
    }

    /// Returns what the most recent status request of the turn did.
    #[must_use]
    pub const fn last_transition(&self) -> Option<TransitionOutcome> {
        self.last_transition
    }

    /// Queues an entry for the next commit.
    pub fn stage(&mut self, entry: NewMessage) {
        self.staged.push(entry);
    }

    /// Returns the entries waiting to be committed.
    #[must_use]
    pub fn staged(&self) -> &[NewMessage] {
        &self.staged
    }

    /// Returns the entries committed so far, in ledger order.
    #[must_use]
    pub fn committed(&self) -> &[Message] {
        &self.committed
    }

    /// Consumes the turn, returning its committed entries.
    #[must_use]
    pub fn into_committed(self) -> Vec<Message> {
        self.committed
    }

    /// Commits the staged entries, optionally followed by a confirmed status
    /// change. Staged entries are kept when the commit fails.
    pub(crate) async fn commit<S>(
        &mut self,
        store: &S,
        thread_id: ThreadId,
        status_change: Option<(ConversationStatus, NewMessage)>,
    ) -> StoreResult<CommitReceipt>
    where
        S: ThreadTransactions + ?Sized,
    {
        let mut commit = ThreadCommit::new(thread_id).with_entries(self.staged.iter().cloned());
        if let Some((target, confirmation)) = status_change {
            commit = commit.with_confirmed_status(target, confirmation);
        }
        if self.opening {
            commit = commit.if_open();
        }
        let receipt = store.commit_thread(commit).await?;
        self.staged.clear();
        self.opening = false;
        self.status = receipt.conversation.status();
        if receipt.transition.is_some() {
            self.last_transition = receipt.transition;
        }
        self.committed.extend(receipt.appended.iter().cloned());
        Ok(receipt)
    }
}
