//! History import through `git svn clone`

use std::path::{Path, PathBuf};
use std::time::Duration;

use svn2git_process::{CommandRunner, ProcessConfig, ProcessOutput};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::Result;
use crate::revision::RevisionRange;

/// Exit code `git svn clone` reports when the destination is already initialised
pub const ALREADY_EXISTS_EXIT_CODE: i32 = 128;

/// How the import step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Import ran to completion
    Success,
    /// Destination already existed; the local repository is reused as is
    AlreadyExists,
    /// Anything else, with the engine's exit code and captured output
    Failed { code: Option<i32>, output: String },
}

impl ImportOutcome {
    /// Classify a finished import run
    ///
    /// A missing exit code, or one accompanied by a broken output stream,
    /// counts as a failure.
    pub fn from_output(output: &ProcessOutput) -> Self {
        match (output.exit_code, &output.stream_error) {
            (Some(0), None) => ImportOutcome::Success,
            (Some(ALREADY_EXISTS_EXIT_CODE), None) => ImportOutcome::AlreadyExists,
            (code, stream_error) => {
                let mut text = output.combined();
                if let Some(err) = stream_error {
                    text.push_str(&format!("\n(output stream failed: {})", err));
                }
                ImportOutcome::Failed { code, output: text }
            }
        }
    }

    /// Whether the local repository can be reconciled afterwards
    pub fn is_usable(&self) -> bool {
        !matches!(self, ImportOutcome::Failed { .. })
    }
}

/// Source layout handed to the conversion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// trunk/branches/tags
    #[default]
    Standard,
    /// Single directory, no branches or tags
    Flat,
}

/// Parameters of one import
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub source_url: String,
    pub destination: PathBuf,
    pub range: RevisionRange,
    pub authors_file: PathBuf,
    pub username: String,
    pub layout: Layout,
}

/// Runs the conversion engine for one record
pub struct ImportRunner<'a> {
    runner: &'a dyn CommandRunner,
    kill_grace: Duration,
}

impl<'a> ImportRunner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, kill_grace: Duration) -> Self {
        Self { runner, kill_grace }
    }

    /// Command line for `request`
    pub fn command(&self, request: &ImportRequest) -> ProcessConfig {
        let mut args = vec![
            "svn".to_string(),
            "clone".to_string(),
            format!("--username={}", request.username),
        ];
        if request.layout == Layout::Standard {
            args.push("--stdlayout".to_string());
        }
        args.push(format!("--revision={}", request.range));
        args.push(format!("--authors-file={}", request.authors_file.display()));
        args.push(request.source_url.clone());
        args.push(path_arg(&request.destination));

        ProcessConfig::new("git")
            .args(args)
            .kill_grace(self.kill_grace)
    }

    /// Import `request`, streaming the engine's output as it arrives
    ///
    /// Only cancellation and spawn problems are errors; the engine's own
    /// verdict is reported through [`ImportOutcome`].
    pub async fn import(
        &self,
        request: &ImportRequest,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome> {
        let config = self.command(request);
        info!(
            url = %request.source_url,
            range = %request.range,
            destination = %request.destination.display(),
            "Importing history"
        );

        let output = self.runner.run(config, cancel).await?;
        let outcome = ImportOutcome::from_output(&output);
        match &outcome {
            ImportOutcome::Success => info!("Import finished"),
            ImportOutcome::AlreadyExists => {
                warn!(
                    destination = %request.destination.display(),
                    "Destination already exists, reusing it"
                )
            }
            ImportOutcome::Failed { code, .. } => warn!(?code, "Import failed"),
        }
        Ok(outcome)
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
