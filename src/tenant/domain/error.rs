//! Error types for tenant domain validation.

use thiserror::Error;

/// Errors returned while constructing tenant values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantDomainError {
    /// The organization identifier is empty or contains whitespace.
    #[error("invalid organization id '{0}'")]
    InvalidOrganizationId(String),
}
