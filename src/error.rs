//! Caller-visible error taxonomy shared by every service.
//!
//! Ports and domain modules keep their own narrow error enums. Services map
//! those into [`SupportError`] at the boundary so callers only ever see the
//! four outcomes below.

use std::sync::Arc;

use thiserror::Error;

use crate::pagination::InvalidCursorError;
use crate::session::domain::SessionDomainError;
use crate::store::StoreError;
use crate::tenant::domain::TenantDomainError;

/// Stable machine-readable code for a [`SupportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Missing or invalid identity, or an organization mismatch.
    Unauthorized,
    /// The referenced record does not exist.
    NotFound,
    /// The request is invalid for the current state.
    BadRequest,
    /// An internal failure.
    Internal,
}

impl ErrorCode {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::Internal => "INTERNAL",
        }
    }
}

/// Errors surfaced to callers of the support services.
#[derive(Debug, Clone, Error)]
pub enum SupportError {
    /// The caller could not be authorized for the requested record.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is not valid for the record's current state.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An internal failure the caller cannot correct.
    #[error("service error: {0}")]
    Service(Arc<dyn std::error::Error + Send + Sync>),
}

impl SupportError {
    /// Creates an [`SupportError::Unauthorized`] error.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized(reason.into())
    }

    /// Creates a [`SupportError::NotFound`] error.
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound(reason.into())
    }

    /// Creates a [`SupportError::BadRequest`] error.
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    /// Wraps an internal failure.
    pub fn service(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Service(Arc::new(err))
    }

    /// Returns the stable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::Service(_) => ErrorCode::Internal,
        }
    }

    /// Returns `true` when retrying the same request could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

impl From<StoreError> for SupportError {
    fn from(err: StoreError) -> Self {
        Self::service(err)
    }
}

impl From<SessionDomainError> for SupportError {
    fn from(err: SessionDomainError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<TenantDomainError> for SupportError {
    fn from(err: TenantDomainError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<InvalidCursorError> for SupportError {
    fn from(err: InvalidCursorError) -> Self {
        Self::bad_request(err.to_string())
    }
}

/// Result type for support service operations.
pub type SupportResult<T> = Result<T, SupportError>;
