//! Shared fixtures: a scripted command runner and import-shaped repositories

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Repository, Signature};
use svn2git_config::MigrationConfig;
use svn2git_process::{CommandRunner, ProcessConfig, ProcessError, ProcessOutput};
use tokio_util::sync::CancellationToken;

type Responder =
    Box<dyn Fn(&ProcessConfig) -> Result<ProcessOutput, ProcessError> + Send + Sync>;

/// Records every command and answers it from a script instead of running it
pub struct ScriptedRunner {
    calls: Mutex<Vec<ProcessConfig>>,
    respond: Responder,
}

impl ScriptedRunner {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&ProcessConfig) -> Result<ProcessOutput, ProcessError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Command lines seen so far, secrets masked
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(ProcessConfig::display_command)
            .collect()
    }

    pub fn calls_matching(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        config: ProcessConfig,
        _cancel: &CancellationToken,
    ) -> svn2git_process::Result<ProcessOutput> {
        self.calls.lock().unwrap().push(config.clone());
        (self.respond)(&config)
    }
}

pub fn exited(code: i32, text: &str) -> Result<ProcessOutput, ProcessError> {
    Ok(ProcessOutput::completed(
        Some(code),
        text.lines().map(str::to_string).collect(),
    ))
}

pub fn ok() -> Result<ProcessOutput, ProcessError> {
    exited(0, "")
}

/// Which tool a command invokes
pub fn is_svn_info(config: &ProcessConfig) -> bool {
    config.command == "svn"
        && config.args.iter().any(|a| a == "info")
        && !config.args.iter().any(|a| a == "--show-item")
}

pub fn is_latest_query(config: &ProcessConfig) -> bool {
    config.command == "svn" && config.args.iter().any(|a| a == "--show-item")
}

pub fn is_log_query(config: &ProcessConfig) -> bool {
    config.command == "svn" && config.args.iter().any(|a| a == "log")
}

pub fn is_clone(config: &ProcessConfig) -> bool {
    config.command == "git" && config.args.first().map(String::as_str) == Some("svn")
}

pub fn is_push(config: &ProcessConfig) -> bool {
    config.command == "git" && config.args.iter().any(|a| a == "push")
}

/// Destination argument of a `git svn clone`
pub fn clone_destination(config: &ProcessConfig) -> &Path {
    Path::new(config.args.last().map(String::as_str).unwrap_or_default())
}

/// Create a repository shaped like a fresh `git svn clone --stdlayout`
///
/// `master` and `origin/trunk` point at the first commit, `origin/feature`
/// at the second, and `origin/tags/v1.0` at the first.
pub fn seed_import(path: &Path) {
    let raw = Repository::init(path).unwrap();
    let sig = Signature::now("Importer", "importer@example.com").unwrap();
    let mut index = raw.index().unwrap();
    let tree = raw.find_tree(index.write_tree().unwrap()).unwrap();
    let first = raw
        .commit(Some("refs/heads/master"), &sig, &sig, "r1", &tree, &[])
        .unwrap();
    let parent = raw.find_commit(first).unwrap();
    let second = raw
        .commit(None, &sig, &sig, "r2", &tree, &[&parent])
        .unwrap();
    raw.set_head("refs/heads/master").unwrap();

    for (name, oid) in [
        ("refs/remotes/origin/trunk", first),
        ("refs/remotes/origin/feature", second),
        ("refs/remotes/origin/tags/v1.0", first),
    ] {
        raw.reference(name, oid, false, "import").unwrap();
    }
}

/// Configuration rooted in `repos_dir`
pub fn config_in(repos_dir: &Path) -> MigrationConfig {
    MigrationConfig {
        svn_username: "alice".to_string(),
        svn_password: "hunter2".to_string(),
        repos_dir: repos_dir.to_path_buf(),
        git_base_url: "https://git.example.com/acme/".to_string(),
        ..MigrationConfig::default()
    }
}
