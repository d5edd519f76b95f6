//! Port contracts for plugin records and the secret vault.

pub mod repository;
pub mod vault;

pub use repository::PluginRepository;
pub use vault::{SecretVault, VaultError, VaultResult};
