//! Publishing a reconciled repository to its destination

use std::path::Path;
use std::time::Duration;

use svn2git_process::{CommandRunner, ProcessConfig};
use svn2git_vcs::{BindingChange, RemoteBinding, RemoteConfig};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{MigrationError, PublishStep, Result};
use crate::svn::describe_failure;

/// Binds the outbound remote and pushes branches and tags to it
pub struct PublishManager<'a> {
    runner: &'a dyn CommandRunner,
    remote_name: String,
    base_url: String,
    kill_grace: Duration,
}

impl<'a> PublishManager<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        remote_name: impl Into<String>,
        base_url: impl Into<String>,
        kill_grace: Duration,
    ) -> Self {
        Self {
            runner,
            remote_name: remote_name.into(),
            base_url: base_url.into(),
            kill_grace,
        }
    }

    /// Binding a destination is expected to carry
    pub fn binding(&self, destination: &str) -> RemoteBinding {
        RemoteBinding::derive(self.remote_name.as_str(), &self.base_url, destination)
    }

    /// Make sure the repository has exactly one correctly pointed outbound remote
    pub fn bind_remote<R>(&self, repo: &R, destination: &str) -> Result<BindingChange>
    where
        R: RemoteConfig + ?Sized,
    {
        self.binding(destination)
            .ensure(repo)
            .map_err(|e| MigrationError::PublishFailed {
                step: PublishStep::Remote,
                detail: e.to_string(),
            })
    }

    /// Push all branches, then all tags
    ///
    /// A failed branch push stops before tags are pushed. Nothing already
    /// pushed is rolled back.
    pub async fn push(&self, repo_dir: &Path, cancel: &CancellationToken) -> Result<()> {
        self.push_step(repo_dir, PublishStep::Branches, "--all", cancel)
            .await?;
        self.push_step(repo_dir, PublishStep::Tags, "--tags", cancel)
            .await?;
        info!(repo = %repo_dir.display(), remote = %self.remote_name, "Published");
        Ok(())
    }

    /// `git -C <dir> push <remote> <what>`
    pub fn push_command(&self, repo_dir: &Path, what: &str) -> ProcessConfig {
        ProcessConfig::new("git")
            .args([
                "-C".to_string(),
                repo_dir.to_string_lossy().into_owned(),
                "push".to_string(),
                self.remote_name.clone(),
                what.to_string(),
            ])
            .kill_grace(self.kill_grace)
    }

    async fn push_step(
        &self,
        repo_dir: &Path,
        step: PublishStep,
        what: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        info!(repo = %repo_dir.display(), "Starting {}", step);
        let output = self
            .runner
            .run(self.push_command(repo_dir, what), cancel)
            .await?;
        if !output.success() {
            return Err(MigrationError::PublishFailed {
                step,
                detail: describe_failure(&output),
            });
        }
        Ok(())
    }
}
