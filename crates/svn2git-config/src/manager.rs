//! Configuration manager implementation
//!
//! Sources, lowest precedence first: built-in defaults, optional TOML file,
//! `SVN2GIT_*` environment variables, explicit overrides (CLI flags).

use std::path::PathBuf;

use config::{Config, Environment, File, Value};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    types::MigrationConfig,
};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "svn2git.toml";
/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "SVN2GIT";

/// Highest-precedence values, typically from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides(Vec<(String, Value)>);

impl Overrides {
    /// Create an empty override set
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `key` when `value` is present
    pub fn set<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.0.push((key.to_string(), value.into()));
        }
        self
    }

    /// Override a flag only when it was raised
    pub fn flag(self, key: &str, raised: bool) -> Self {
        self.set(key, raised.then_some(true))
    }

    /// Number of overridden keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is overridden
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Configuration manager
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load, merge and validate the configuration
    pub fn load(&self, overrides: &Overrides) -> Result<MigrationConfig> {
        debug!(
            path = %self.config_path.display(),
            prefix = %self.env_prefix,
            overrides = overrides.len(),
            "Loading configuration"
        );

        let mut builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix));

        for (key, value) in &overrides.0 {
            builder = builder.set_override(key.as_str(), value.clone())?;
        }

        let config: MigrationConfig = builder.build()?.try_deserialize()?;
        self.validate_config(&config)?;
        Ok(config)
    }

    /// Reject configurations a run cannot work with
    pub fn validate_config(&self, config: &MigrationConfig) -> Result<()> {
        if config.svn_username.trim().is_empty() {
            return Err(ConfigError::Validation(
                "svn_username must be set".to_string(),
            ));
        }
        if config.svn_password.is_empty() {
            return Err(ConfigError::Validation(
                "svn_password must be set".to_string(),
            ));
        }
        if config.git_base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "git_base_url must not be empty".to_string(),
            ));
        }
        if config.remote_name.trim().is_empty() || config.tracking_remote.trim().is_empty() {
            return Err(ConfigError::Validation(
                "remote names must not be empty".to_string(),
            ));
        }
        if config.kill_grace_secs == 0 {
            return Err(ConfigError::Validation(
                "kill_grace_secs must be greater than 0".to_string(),
            ));
        }
        if config.migrate_from_copy && config.ignore_history {
            return Err(ConfigError::Validation(
                "migrate_from_copy and ignore_history are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
