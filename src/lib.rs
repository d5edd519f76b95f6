//! Switchboard: multi-tenant customer-support conversation backend.
//!
//! Visitors open contact sessions and chat with an automated agent that can
//! search the organization's knowledge base, resolve the conversation or hand
//! it to human operators. Operators read and answer the conversations of
//! their organization and store credentials for third-party plugins.
//!
//! # Architecture
//!
//! Switchboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory store,
//!   scripted generation engine, etc.)
//!
//! # Modules
//!
//! - [`session`]: Visitor contact sessions and their expiry
//! - [`conversation`]: Conversations and their status state machine
//! - [`message`]: Append-only thread ledgers
//! - [`agent`]: The automated support agent and its tools
//! - [`plugin`]: Third-party plugin credentials
//! - [`tenant`]: Organizations and authorization
//! - [`store`]: The shared transactional store

pub mod agent;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod pagination;
pub mod plugin;
pub mod session;
pub mod store;
pub mod tenant;

#[cfg(test)]
mod test_support;
