//! Domain types for tenant scoping.

mod error;
mod identity;
mod ids;

pub use error::TenantDomainError;
pub use identity::OperatorIdentity;
pub use ids::OrganizationId;
