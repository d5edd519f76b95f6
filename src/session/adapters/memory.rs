//! [`ContactSessionRepository`] for the in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::session::{
    domain::{ContactSession, ContactSessionId},
    ports::ContactSessionRepository,
};
use crate::store::{InMemoryStore, StoreError, StoreResult};

#[async_trait]
impl ContactSessionRepository for InMemoryStore {
    async fn insert_session(&self, session: &ContactSession) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.sessions.contains_key(&session.id()) {
            return Err(StoreError::DuplicateSession(session.id()));
        }
        state
            .sessions_by_expiry
            .insert((session.expires_at(), session.id()));
        state.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn update_session(&self, session: &ContactSession) -> StoreResult<()> {
        let mut state = self.write()?;
        let previous_expiry = state
            .sessions
            .get(&session.id())
            .map(ContactSession::expires_at)
            .ok_or(StoreError::SessionNotFound(session.id()))?;

        state
            .sessions_by_expiry
            .remove(&(previous_expiry, session.id()));
        state
            .sessions_by_expiry
            .insert((session.expires_at(), session.id()));
        state.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn find_session(&self, id: ContactSessionId) -> StoreResult<Option<ContactSession>> {
        let state = self.read()?;
        Ok(state.sessions.get(&id).cloned())
    }

    async fn delete_sessions_expired_before(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let mut state = self.write()?;
        let expired: Vec<(DateTime<Utc>, ContactSessionId)> = state
            .sessions_by_expiry
            .iter()
            .take_while(|(expires_at, _)| *expires_at < now)
            .copied()
            .collect();

        for key in &expired {
            state.sessions_by_expiry.remove(key);
            state.sessions.remove(&key.1);
        }
        Ok(expired.len())
    }
}
