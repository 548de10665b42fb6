//! Managed child process wrapper

use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, warn};

use crate::{
    config::{KillScope, ProcessConfig},
    error::{ProcessError, Result},
    tree,
};

/// A running external process owned by the supervisor
///
/// Holds the process id, the ordered output buffer and the exit code once
/// known. Dropping a handle whose scope includes the parent kills whatever
/// is left of its process group.
#[derive(Debug)]
pub struct ExternalProcessHandle {
    /// Underlying tokio child process
    child: Child,
    /// Process configuration
    config: ProcessConfig,
    /// Process ID
    pid: u32,
    /// Output lines in emission order
    output: Vec<String>,
    /// Exit code, once observed
    exit_code: Option<i32>,
}

impl ExternalProcessHandle {
    /// Create new managed child
    pub(crate) fn new(child: Child, config: ProcessConfig, pid: u32) -> Self {
        Self {
            child,
            config,
            pid,
            output: Vec::new(),
            exit_code: None,
        }
    }

    /// Get process ID
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get process configuration
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Lines captured so far
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Last observed exit code
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Append a line to the output buffer
    pub(crate) fn record_line(&mut self, line: String) {
        self.output.push(line);
    }

    /// Move the captured output out of the handle
    pub(crate) fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Check if process is still running
    pub fn is_running(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.exit_code = status.code();
                false
            }
            Ok(None) => true,
            Err(_) => false,
        }
    }

    /// Wait for process to exit
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait().await?;
        self.exit_code = status.code();
        Ok(status)
    }

    /// Kill the process tree
    ///
    /// Descendants are terminated first and given `grace` to exit before
    /// being force-killed. With [`KillScope::ProcessTree`] the process itself
    /// is then killed and reaped.
    pub async fn kill_tree(&mut self, scope: KillScope, grace: Duration) -> Result<()> {
        debug!(pid = %self.pid, ?scope, "Killing process tree");

        let forced = tree::kill_descendants(self.pid, grace).await;
        if !forced.is_empty() {
            debug!(pid = %self.pid, forced = ?forced, "Force-killed descendants");
        }

        if !scope.includes_parent() {
            return Ok(());
        }

        self.kill_group();
        if self.is_running() {
            if let Err(e) = self.child.start_kill() {
                warn!(pid = %self.pid, error = %e, "Failed to kill process");
                return Err(ProcessError::KillFailed(e.to_string()));
            }
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                self.exit_code = status.code();
                debug!(pid = %self.pid, "Process tree killed");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(pid = %self.pid, error = %e, "Error waiting for process");
                Err(ProcessError::KillFailed(e.to_string()))
            }
            Err(_) => {
                warn!(pid = %self.pid, "Timeout waiting for process to exit");
                Err(ProcessError::KillFailed(format!(
                    "process {} still running after {}s",
                    self.pid,
                    grace.as_secs()
                )))
            }
        }
    }

    /// SIGKILL the whole process group (Unix only)
    fn kill_group(&self) {
        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            // ESRCH just means the group is already empty
            if let Err(e) = killpg(Pid::from_raw(self.pid as i32), Signal::SIGKILL) {
                debug!(pid = %self.pid, error = %e, "Process group not signalled");
            }
        }
    }

    /// Take stdout handle
    pub fn stdout(&mut self) -> Option<tokio::process::ChildStdout> {
        self.child.stdout.take()
    }

    /// Take stderr handle
    pub fn stderr(&mut self) -> Option<tokio::process::ChildStderr> {
        self.child.stderr.take()
    }
}

impl Drop for ExternalProcessHandle {
    fn drop(&mut self) {
        if !self.config.kill_scope.includes_parent() {
            return;
        }
        self.kill_group();
        if self.is_running() {
            let _ = self.child.start_kill();
        }
    }
}
