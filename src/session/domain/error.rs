//! Error types for contact session validation.

use crate::tenant::domain::TenantDomainError;
use thiserror::Error;

/// Errors returned while constructing contact sessions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionDomainError {
    /// The organization identifier is invalid.
    #[error(transparent)]
    Tenant(#[from] TenantDomainError),

    /// The visitor name is empty after trimming.
    #[error("visitor name must not be empty")]
    EmptyName,

    /// The visitor email is not a plausible address.
    #[error("invalid visitor email '{0}'")]
    InvalidEmail(String),
}
