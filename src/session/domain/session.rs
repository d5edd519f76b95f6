//! Contact session aggregate.

use super::{ContactSessionId, SessionDomainError, SessionMetadata};
use crate::tenant::domain::OrganizationId;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for opening a contact session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactSession {
    organization_id: OrganizationId,
    name: String,
    email: String,
    metadata: SessionMetadata,
}

impl NewContactSession {
    /// Validates the visitor details.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError`] when the organization id is malformed,
    /// the name is blank or the email is not of the form `local@domain`.
    pub fn new(
        organization: impl Into<String>,
        visitor_name: impl Into<String>,
        visitor_email: impl Into<String>,
    ) -> Result<Self, SessionDomainError> {
        let organization_id = OrganizationId::new(organization)?;
        let name = visitor_name.into().trim().to_owned();
        if name.is_empty() {
            return Err(SessionDomainError::EmptyName);
        }
        let email = visitor_email.into().trim().to_owned();
        if !is_plausible_email(&email) {
            return Err(SessionDomainError::InvalidEmail(email));
        }
        Ok(Self {
            organization_id,
            name,
            email,
            metadata: SessionMetadata::default(),
        })
    }

    /// Attaches the client fingerprint.
    #[must_use]
    pub fn with_metadata(mut self, metadata: SessionMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// A visitor's time-boxed identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSession {
    id: ContactSessionId,
    organization_id: OrganizationId,
    name: String,
    email: String,
    metadata: SessionMetadata,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl ContactSession {
    /// Opens a session that expires `ttl` after the current clock time.
    #[must_use]
    pub fn open(request: NewContactSession, ttl: TimeDelta, clock: &impl Clock) -> Self {
        let now = clock.utc();
        Self {
            id: ContactSessionId::new(),
            organization_id: request.organization_id,
            name: request.name,
            email: request.email,
            metadata: request.metadata,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> ContactSessionId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub const fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    /// Returns the visitor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the visitor email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the client fingerprint.
    #[must_use]
    pub const fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns `true` while `now` is strictly before the expiry.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Pushes the expiry to `ttl` after now when less than `threshold`
    /// remains.
    ///
    /// Returns `true` when the expiry moved.
    pub fn extend_if_expiring(
        &mut self,
        ttl: TimeDelta,
        threshold: TimeDelta,
        clock: &impl Clock,
    ) -> bool {
        let now = clock.utc();
        if self.expires_at - now >= threshold {
            return false;
        }
        self.expires_at = now + ttl;
        true
    }
}
