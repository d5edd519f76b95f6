//! Port contracts for contact session persistence.

pub mod repository;

pub use repository::ContactSessionRepository;
