//! Subversion source queries
//!
//! All queries go through the `svn` command line client in non-interactive
//! mode with the run's credentials.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use svn2git_process::{CommandRunner, ProcessConfig, ProcessOutput};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{MigrationError, Result};

/// Revision line of `svn log --quiet`: `r123 | author | date`
static LOG_REVISION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^r(\d+) \|").expect("revision pattern is valid"));

/// Source repository credentials
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Read-only view of a source repository
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Fail with [`MigrationError::SourceUnavailable`] if the source cannot be reached
    async fn check_available(&self, cancel: &CancellationToken) -> Result<()>;

    /// Newest revision that changed the source path
    async fn latest_revision(&self, cancel: &CancellationToken) -> Result<u64>;

    /// Revision at which the source path was copied into existence
    async fn branch_point_revision(&self, cancel: &CancellationToken) -> Result<u64>;
}

/// `svn` command line client bound to one source URL
pub struct SvnClient<'a> {
    runner: &'a dyn CommandRunner,
    url: String,
    credentials: Credentials,
    kill_grace: Duration,
}

impl<'a> SvnClient<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        url: impl Into<String>,
        credentials: Credentials,
        kill_grace: Duration,
    ) -> Self {
        Self {
            runner,
            url: url.into(),
            credentials,
            kill_grace,
        }
    }

    /// Source URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `svn` invocation with credentials, followed by `subcommand` and the URL
    pub fn command(&self, subcommand: &[&str]) -> ProcessConfig {
        let mut args = vec![
            "--non-interactive",
            "--username",
            self.credentials.username.as_str(),
            "--password",
            self.credentials.password.as_str(),
        ];
        args.extend_from_slice(subcommand);
        args.push(self.url.as_str());

        ProcessConfig::new("svn")
            .args(args)
            .secret(self.credentials.password.as_str())
            .kill_grace(self.kill_grace)
    }

    async fn run(&self, subcommand: &[&str], cancel: &CancellationToken) -> Result<ProcessOutput> {
        let config = self.command(subcommand);
        debug!(command = %config.display_command(), "Querying source");
        let output = self.runner.run(config, cancel).await?;
        if !output.success() {
            return Err(self.unavailable(describe_failure(&output)));
        }
        Ok(output)
    }

    fn unavailable(&self, detail: impl Into<String>) -> MigrationError {
        MigrationError::SourceUnavailable {
            url: self.url.clone(),
            detail: detail.into(),
        }
    }
}

#[async_trait]
impl SourceRepository for SvnClient<'_> {
    async fn check_available(&self, cancel: &CancellationToken) -> Result<()> {
        self.run(&["info"], cancel).await?;
        info!(url = %self.url, "Source repository reachable");
        Ok(())
    }

    async fn latest_revision(&self, cancel: &CancellationToken) -> Result<u64> {
        let output = self
            .run(&["info", "--show-item", "last-changed-revision"], cancel)
            .await?;
        parse_latest_revision(&output.lines)
            .ok_or_else(|| self.unavailable("no revision information reported"))
    }

    async fn branch_point_revision(&self, cancel: &CancellationToken) -> Result<u64> {
        let output = self
            .run(&["log", "--stop-on-copy", "--quiet"], cancel)
            .await?;
        parse_branch_point(&output.lines)
            .ok_or_else(|| self.unavailable("no history reported since the last copy"))
    }
}

/// Last line of `svn info --show-item` that is a revision number
pub fn parse_latest_revision(lines: &[String]) -> Option<u64> {
    lines
        .iter()
        .rev()
        .find_map(|line| line.trim().parse::<u64>().ok())
}

/// Oldest revision in a `svn log --stop-on-copy --quiet` listing
///
/// The log lists newest first, so the branch point is the last entry.
pub fn parse_branch_point(lines: &[String]) -> Option<u64> {
    lines
        .iter()
        .filter_map(|line| LOG_REVISION.captures(line.trim()))
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .last()
}

pub(crate) fn describe_failure(output: &ProcessOutput) -> String {
    let code = match output.exit_code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    };
    match &output.stream_error {
        Some(err) => format!("{} (output stream failed: {}): {}", code, err, output.combined()),
        None => format!("{}: {}", code, output.combined()),
    }
}
