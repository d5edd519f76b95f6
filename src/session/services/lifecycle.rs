//! Service layer for contact session issuance, validation and expiry.

use crate::config::SessionConfig;
use crate::error::{SupportError, SupportResult};
use crate::session::{
    domain::{ContactSession, ContactSessionId, NewContactSession, SessionMetadata},
    ports::ContactSessionRepository,
};
use crate::store::StoreError;
use mockable::Clock;
use std::sync::Arc;

/// Request payload for opening a contact session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateContactSessionRequest {
    organization_id: String,
    name: String,
    email: String,
    metadata: SessionMetadata,
}

impl CreateContactSessionRequest {
    /// Creates a request with the required visitor fields.
    #[must_use]
    pub fn new(
        organization_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            name: name.into(),
            email: email.into(),
            metadata: SessionMetadata::default(),
        }
    }

    /// Sets the client fingerprint.
    #[must_use]
    pub fn with_metadata(mut self, metadata: SessionMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Contact session lifecycle service.
pub struct ContactSessionService<R, C>
where
    R: ContactSessionRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: SessionConfig,
}

impl<R, C> Clone for ContactSessionService<R, C>
where
    R: ContactSessionRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<R, C> ContactSessionService<R, C>
where
    R: ContactSessionRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new contact session service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, config: SessionConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Opens a session that expires one TTL from now.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::BadRequest`] when the visitor details are
    /// invalid, or [`SupportError::Service`] when persistence fails.
    pub async fn create(
        &self,
        request: CreateContactSessionRequest,
    ) -> SupportResult<ContactSession> {
        let validated = NewContactSession::new(request.organization_id, request.name, request.email)?
            .with_metadata(request.metadata);
        let session = ContactSession::open(validated, self.config.ttl(), &*self.clock);
        self.repository.insert_session(&session).await?;
        tracing::info!(
            contact_session_id = %session.id(),
            organization_id = %session.organization_id(),
            "contact session opened"
        );
        Ok(session)
    }

    /// Returns `true` when the session exists and has not expired.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Service`] when persistence lookup fails.
    pub async fn validate(&self, id: ContactSessionId) -> SupportResult<bool> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    /// Retrieves a live session.
    ///
    /// Sessions past their expiry are reported as absent even before the
    /// sweeper deletes them.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Service`] when persistence lookup fails.
    pub async fn get_by_id(&self, id: ContactSessionId) -> SupportResult<Option<ContactSession>> {
        let now = self.clock.utc();
        let found = self.repository.find_session(id).await?;
        Ok(found.filter(|session| session.is_valid_at(now)))
    }

    /// Keeps a live session alive.
    ///
    /// The expiry moves to one TTL from now only when less than the refresh
    /// threshold remains.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the session is absent or
    /// expired, including when a sweep removes it before the new expiry is
    /// stored.
    pub async fn refresh(&self, id: ContactSessionId) -> SupportResult<ContactSession> {
        let mut session = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| SupportError::unauthorized("invalid contact session"))?;
        if session.extend_if_expiring(
            self.config.ttl(),
            self.config.refresh_threshold(),
            &*self.clock,
        ) {
            self.repository
                .update_session(&session)
                .await
                .map_err(|err| match err {
                    StoreError::SessionNotFound(_) => {
                        SupportError::unauthorized("invalid contact session")
                    }
                    other => other.into(),
                })?;
            tracing::debug!(contact_session_id = %id, "contact session extended");
        }
        Ok(session)
    }

    /// Deletes every session that expired before now.
    ///
    /// Returns the number of deleted sessions.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Service`] when persistence fails.
    pub async fn clear_expired(&self) -> SupportResult<usize> {
        let now = self.clock.utc();
        Ok(self.repository.delete_sessions_expired_before(now).await?)
    }
}
