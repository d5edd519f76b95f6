//! Repository port for contact sessions.

use crate::session::domain::{ContactSession, ContactSessionId};
use crate::store::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Contact session persistence contract.
///
/// Implementations index sessions by expiry so sweeps do not scan the whole
/// table.
#[async_trait]
pub trait ContactSessionRepository: Send + Sync {
    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::DuplicateSession`] when the
    /// identifier already exists.
    async fn insert_session(&self, session: &ContactSession) -> StoreResult<()>;

    /// Replaces a stored session (expiry refresh).
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::SessionNotFound`] when the session
    /// does not exist.
    async fn update_session(&self, session: &ContactSession) -> StoreResult<()>;

    /// Finds a session by identifier, regardless of expiry.
    ///
    /// Returns `None` when the session does not exist.
    async fn find_session(&self, id: ContactSessionId) -> StoreResult<Option<ContactSession>>;

    /// Deletes every session whose expiry is strictly before `now`.
    ///
    /// Returns the number of deleted sessions.
    async fn delete_sessions_expired_before(&self, now: DateTime<Utc>) -> StoreResult<usize>;
}
