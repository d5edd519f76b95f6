//! Application services for plugin credentials.

mod gateway;

pub use gateway::{PluginGateway, PluginSync};
