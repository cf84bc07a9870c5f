//! Configuration module for the studio
//!
//! Provides types and loading for `studio.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
