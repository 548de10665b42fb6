//! Error types for supervised process execution

use std::io;
use thiserror::Error;

use crate::output::ProcessOutput;

/// Process supervision errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process
    #[error("Failed to spawn process: {0}")]
    SpawnFailed(#[from] io::Error),

    /// Run was cancelled; the process tree has been torn down
    #[error("Process cancelled after {} line(s) of output", output.lines.len())]
    Cancelled { output: ProcessOutput },

    /// Failed to kill process
    #[error("Failed to kill process: {0}")]
    KillFailed(String),

    /// Invalid configuration
    #[error("Invalid process configuration: {0}")]
    InvalidConfig(String),
}

impl ProcessError {
    /// Whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProcessError::Cancelled { .. })
    }
}

/// Result type for process operations
pub type Result<T> = std::result::Result<T, ProcessError>;
