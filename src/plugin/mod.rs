//! Per-organization third-party plugin credentials.
//!
//! The local record only says that a plugin is connected and where its
//! secret lives. The secret itself is written to an external vault by a
//! background task, so connecting returns before the vault has been touched.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The gateway service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
