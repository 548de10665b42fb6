//! Error types for the migration engine

use std::fmt;

use svn2git_process::ProcessError;
use svn2git_vcs::VcsError;
use thiserror::Error;

/// Result type for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Publish sub-step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    /// Binding the outbound remote
    Remote,
    /// Pushing all branches
    Branches,
    /// Pushing all tags
    Tags,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStep::Remote => write!(f, "remote binding"),
            PublishStep::Branches => write!(f, "branch push"),
            PublishStep::Tags => write!(f, "tag push"),
        }
    }
}

/// Per-record migration failures
///
/// Every variant is fatal for the record it occurred in and never for the
/// batch; the orchestrator logs it and moves on.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Source unreachable or reporting no revision information
    #[error("Source repository unavailable ({url}): {detail}")]
    SourceUnavailable { url: String, detail: String },

    /// Conversion engine failed for a reason other than an existing destination
    #[error("Import failed ({}):\n{output}", exit_status(.code))]
    ImportFailed { code: Option<i32>, output: String },

    /// Unexpected local repository state
    #[error("Reconciliation error: {0}")]
    ReconciliationError(#[from] VcsError),

    /// Remote binding or push failed; earlier pushes are not rolled back
    #[error("Publish failed during {step}: {detail}")]
    PublishFailed { step: PublishStep, detail: String },

    /// Revision range string could not be used
    #[error("Invalid revision range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    /// Manifest could not be read
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Interrupted by the operator
    #[error("Migration cancelled")]
    Cancelled,

    /// External tool could not be run
    #[error("Process error: {0}")]
    Process(ProcessError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

impl From<ProcessError> for MigrationError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Cancelled { .. } => MigrationError::Cancelled,
            other => MigrationError::Process(other),
        }
    }
}

impl From<csv::Error> for MigrationError {
    fn from(err: csv::Error) -> Self {
        MigrationError::Manifest(err.to_string())
    }
}
