//! Process supervisor - spawn, stream, tear down

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    child::ExternalProcessHandle,
    config::{KillScope, ProcessConfig},
    error::{ProcessError, Result},
    output::ProcessOutput,
};

/// Tracing target for streamed child output
pub const OUTPUT_TARGET: &str = "svn2git::output";

#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Runs external commands one at a time with tree-kill-on-cancel
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSupervisor;

impl ProcessSupervisor {
    /// Create new process supervisor
    pub fn new() -> Self {
        Self
    }

    /// Spawn a managed process in its own process group
    ///
    /// stdin is closed; stdout and stderr are piped.
    ///
    /// # Examples
    /// ```no_run
    /// use svn2git_process::{ProcessConfig, ProcessSupervisor};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let supervisor = ProcessSupervisor::new();
    /// let config = ProcessConfig::new("echo").args(["hello"]);
    /// let child = supervisor.spawn(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn(&self, config: ProcessConfig) -> Result<ExternalProcessHandle> {
        if config.command.is_empty() {
            return Err(ProcessError::InvalidConfig("empty command".to_string()));
        }

        debug!(command = %config.display_command(), "Spawning process");

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);

        if let Some(ref dir) = config.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        detach(&mut cmd);

        let child = cmd.spawn()?;
        let pid = child.id().ok_or_else(|| {
            ProcessError::SpawnFailed(io::Error::new(
                io::ErrorKind::Other,
                "Failed to get process ID",
            ))
        })?;

        info!(pid = %pid, command = %config.command, "Process spawned");

        Ok(ExternalProcessHandle::new(child, config, pid))
    }

    /// Run a command to completion, streaming its output
    ///
    /// - normal exit: the real exit code and every captured line
    /// - `cancel` fired: the tree is killed per `config.kill_scope` and
    ///   [`ProcessError::Cancelled`] carries the partial output
    /// - output stream failure: the tree is killed and the partial output is
    ///   returned with whatever exit code was last seen (possibly `None`)
    pub async fn supervise(
        &self,
        config: ProcessConfig,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput> {
        info!(command = %config.display_command(), "Executing");

        let scope = config.kill_scope;
        let grace = config.kill_grace;
        let mut child = self.spawn(config)?;
        let mut lines = stream_lines(&mut child);

        debug!(pid = %child.pid(), "Waiting for process to finish");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(cancelled(&mut child, scope, grace).await);
                }
                next = lines.recv() => match next {
                    Some(Ok(line)) => {
                        info!(target: OUTPUT_TARGET, "{}", line);
                        child.record_line(line);
                    }
                    Some(Err(e)) => {
                        error!(pid = %child.pid(), error = %e, "Output stream failed, tearing down process tree");
                        if let Err(kill) = child.kill_tree(scope, grace).await {
                            warn!(pid = %child.pid(), error = %kill, "Cleanup after stream failure incomplete");
                        }
                        return Ok(ProcessOutput {
                            exit_code: child.exit_code(),
                            lines: child.take_output(),
                            stream_error: Some(e.to_string()),
                        });
                    }
                    None => break,
                }
            }
        }

        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(cancelled(&mut child, scope, grace).await);
            }
            status = child.wait() => status?,
        };

        debug!(pid = %child.pid(), code = ?status.code(), "Process exited");
        Ok(ProcessOutput::completed(status.code(), child.take_output()))
    }
}

async fn cancelled(child: &mut ExternalProcessHandle, scope: KillScope, grace: Duration) -> ProcessError {
    warn!(pid = %child.pid(), ?scope, "Cancellation requested, tearing down process tree");
    if let Err(e) = child.kill_tree(scope, grace).await {
        warn!(pid = %child.pid(), error = %e, "Cleanup after cancellation incomplete");
    }
    ProcessError::Cancelled {
        output: ProcessOutput {
            exit_code: child.exit_code(),
            lines: child.take_output(),
            stream_error: None,
        },
    }
}

#[cfg(unix)]
fn detach(cmd: &mut Command) {
    cmd.process_group(0);
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_cmd: &mut Command) {}

/// Merge stdout and stderr into one line channel, in arrival order
fn stream_lines(child: &mut ExternalProcessHandle) -> mpsc::UnboundedReceiver<io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    if let Some(stdout) = child.stdout() {
        tokio::spawn(forward_lines(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr() {
        tokio::spawn(forward_lines(stderr, tx));
    }
    rx
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<io::Result<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                if tx.send(Ok(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e));
                break;
            }
        }
    }
}
