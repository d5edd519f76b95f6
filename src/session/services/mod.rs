//! Application services for contact sessions.

mod lifecycle;
mod sweeper;

pub use lifecycle::{ContactSessionService, CreateContactSessionRequest};
pub use sweeper::ExpirySweeper;
