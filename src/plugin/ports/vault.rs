//! Port for the external secret vault.

use crate::plugin::domain::SecretName;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors returned by vault implementations.
#[derive(Debug, Clone, Error)]
pub enum VaultError {
    /// A secret with the name already exists.
    #[error("secret already exists: {0}")]
    AlreadyExists(SecretName),

    /// The vault could not be reached or rejected the request.
    #[error("vault unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl VaultError {
    /// Wraps a transport or service error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

/// Key/value secret storage.
///
/// Values are opaque strings; the gateway stores JSON documents.
#[async_trait]
pub trait SecretVault: Send + Sync {
    /// Creates a secret.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::AlreadyExists`] when the name is taken.
    async fn create_secret(&self, name: &SecretName, value: &str) -> VaultResult<()>;

    /// Overwrites an existing secret.
    async fn put_secret(&self, name: &SecretName, value: &str) -> VaultResult<()>;

    /// Reads a secret.
    async fn get_secret(&self, name: &SecretName) -> VaultResult<Option<String>>;
}
