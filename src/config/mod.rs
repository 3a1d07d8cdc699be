//! Configuration module for fridge
//!
//! Provides types and loading for `fridge.toml`.

pub mod loader;
pub mod schema;

pub use loader::{find_config, load_config, ConfigError, CONFIG_FILE};
pub use schema::*;
