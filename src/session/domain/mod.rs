//! Domain model for contact sessions.

mod error;
mod ids;
mod metadata;
mod session;

pub use error::SessionDomainError;
pub use ids::ContactSessionId;
pub use metadata::SessionMetadata;
pub use session::{ContactSession, NewContactSession};
