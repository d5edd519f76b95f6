//! Step definitions for support flow scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
