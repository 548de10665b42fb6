//! svn2git configuration
//!
//! Loads the per-run [`MigrationConfig`] from defaults, an optional TOML file,
//! the environment and command-line overrides, and validates it.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::{ConfigManager, Overrides, DEFAULT_CONFIG_FILE, DEFAULT_ENV_PREFIX};
pub use types::{default_authors_file, MigrationConfig};
