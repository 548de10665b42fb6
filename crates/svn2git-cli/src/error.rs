// CLI errors

use svn2git_config::ConfigError;
use svn2git_core::MigrationError;
use thiserror::Error;

/// Errors that stop a run before or around the batch
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Migration(#[from] MigrationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(e) => format!(
                "{}\n\nPass --svn-username and --svn-password, or set them in svn2git.toml or SVN2GIT_* variables.",
                e
            ),
            CliError::Migration(MigrationError::Manifest(msg)) => format!(
                "Cannot read the manifest: {}\n\nThe manifest needs a header row with svn_url and git_path columns.",
                msg
            ),
            CliError::Migration(e) => e.to_string(),
            CliError::Io(e) => format!("File operation failed: {}", e),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
