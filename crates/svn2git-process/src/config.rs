//! Process configuration

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default grace period between the polite and the forced kill
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(5);

/// Which part of the process tree is torn down on cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KillScope {
    /// Descendants and the spawned process itself
    #[default]
    ProcessTree,
    /// Descendants only; the spawned process is left running
    DescendantsOnly,
}

impl KillScope {
    /// Whether the spawned process itself is killed
    pub fn includes_parent(self) -> bool {
        matches!(self, KillScope::ProcessTree)
    }
}

/// Configuration for spawning a supervised process
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Executable command
    pub command: String,
    /// Command arguments
    pub args: Vec<String>,
    /// Working directory (None = current dir)
    pub working_dir: Option<PathBuf>,
    /// Environment variables (added to parent env)
    pub env: HashMap<String, String>,
    /// Grace period between polite and forced kill during cleanup
    pub kill_grace: Duration,
    /// Part of the tree killed on cancellation
    pub kill_scope: KillScope,
    /// Values masked when the command line is logged
    pub secrets: Vec<String>,
}

impl ProcessConfig {
    /// Create new process configuration
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: vec![],
            working_dir: None,
            env: HashMap::new(),
            kill_grace: DEFAULT_KILL_GRACE,
            kill_scope: KillScope::default(),
            secrets: vec![],
        }
    }

    /// Build a configuration from an argv-style sequence
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let command = argv.next()?;
        Some(Self::new(command).args(argv))
    }

    /// Set command arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Append a single argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set working directory
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Add environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the kill grace period
    pub fn kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    /// Set the kill scope used on cancellation
    pub fn kill_scope(mut self, scope: KillScope) -> Self {
        self.kill_scope = scope;
        self
    }

    /// Mask a value (typically a password) in logged command lines
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.push(value);
        }
        self
    }

    /// Command line as it may be shown to operators
    pub fn display_command(&self) -> String {
        std::iter::once(&self.command)
            .chain(self.args.iter())
            .map(|part| {
                self.secrets
                    .iter()
                    .fold(part.clone(), |acc, secret| acc.replace(secret.as_str(), "****"))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv() {
        let config = ProcessConfig::from_argv(["git", "push", "origin", "--all"]).unwrap();
        assert_eq!(config.command, "git");
        assert_eq!(config.args, vec!["push", "origin", "--all"]);

        assert!(ProcessConfig::from_argv(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_display_command_masks_secrets() {
        let config = ProcessConfig::new("svn")
            .args(["--username", "alice", "--password", "hunter2", "info"])
            .secret("hunter2");

        let shown = config.display_command();
        assert_eq!(shown, "svn --username alice --password **** info");
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_empty_secret_is_ignored() {
        let config = ProcessConfig::new("svn").arg("info").secret("");
        assert!(config.secrets.is_empty());
        assert_eq!(config.display_command(), "svn info");
    }

    #[test]
    fn test_defaults() {
        let config = ProcessConfig::new("git");
        assert_eq!(config.kill_grace, DEFAULT_KILL_GRACE);
        assert_eq!(config.kill_scope, KillScope::ProcessTree);
        assert!(KillScope::ProcessTree.includes_parent());
        assert!(!KillScope::DescendantsOnly.includes_parent());
    }
}
