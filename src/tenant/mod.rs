//! Tenancy and authorization.
//!
//! Two trust domains exist side by side and never authorize each other:
//!
//! - Operators carry an [`domain::OperatorIdentity`] whose organization scopes
//!   every conversation and message they touch.
//! - Visitors carry a contact session identifier that is re-validated for
//!   freshness on every call.
//!
//! [`services::AuthorizationGuard`] implements both checks.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
