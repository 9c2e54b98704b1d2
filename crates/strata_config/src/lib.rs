//! Parsing and validation of `strata.toml` configuration files.
//!
//! The configuration controls render depth, helper-block simplification,
//! layout sizing, high-fanout handling and additional port-role rules for
//! link types the built-in table does not know. Every section is optional.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
