//! Domain model for plugin credentials.

mod record;
mod service;

pub use record::{PluginRecord, SecretName};
pub use service::{ParsePluginServiceError, PluginService};
