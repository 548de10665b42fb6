//! Core configuration types

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Everything one migration run needs
///
/// Built once at startup and passed by reference to each component.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MigrationConfig {
    /// Username for the source repository
    pub svn_username: String,
    /// Password for the source repository
    pub svn_password: String,
    /// Manifest listing the repositories to migrate
    pub manifest_path: PathBuf,
    /// Author mapping file handed to the conversion engine
    pub authors_file: PathBuf,
    /// Revision range used when a manifest row has no revision column
    pub default_revisions: String,
    /// Directory the local repositories are created under
    pub repos_dir: PathBuf,
    /// Prefix of the outbound remote URL
    pub git_base_url: String,
    /// Name of the outbound remote
    pub remote_name: String,
    /// Remote the import step files tracking refs under
    pub tracking_remote: String,
    /// Source name of the main development line
    pub primary_line: String,
    /// Annotation written into created tags
    pub tag_message: String,
    /// Seconds between polite and forced kill during cleanup
    pub kill_grace_secs: u64,
    /// Import only since the branch point of the source path
    pub migrate_from_copy: bool,
    /// Import only the latest revision
    pub ignore_history: bool,
    /// Source does not follow trunk/branches/tags
    pub no_stdlayout: bool,
    /// Skip pre-flight, range resolution and import
    pub skip_import: bool,
}

impl MigrationConfig {
    /// Kill grace period as a duration
    pub fn kill_grace(&self) -> Duration {
        Duration::from_secs(self.kill_grace_secs)
    }

    /// Local path of a destination repository
    pub fn repo_dir(&self, destination: &str) -> PathBuf {
        self.repos_dir.join(destination)
    }
}

/// Default author mapping location
pub fn default_authors_file() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("authors.txt")
    } else {
        PathBuf::from("./authors.txt")
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            svn_username: String::new(),
            svn_password: String::new(),
            manifest_path: PathBuf::from("to_migrate.csv"),
            authors_file: default_authors_file(),
            default_revisions: "BASE:HEAD".to_string(),
            repos_dir: PathBuf::from("git_repos/"),
            git_base_url: "https://github.com/username/".to_string(),
            remote_name: "origin".to_string(),
            tracking_remote: "origin".to_string(),
            primary_line: "trunk".to_string(),
            tag_message: "Tag created by svn2git".to_string(),
            kill_grace_secs: 5,
            migrate_from_copy: false,
            ignore_history: false,
            no_stdlayout: false,
            skip_import: false,
        }
    }
}

impl fmt::Debug for MigrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationConfig")
            .field("svn_username", &self.svn_username)
            .field("svn_password", &"****")
            .field("manifest_path", &self.manifest_path)
            .field("authors_file", &self.authors_file)
            .field("default_revisions", &self.default_revisions)
            .field("repos_dir", &self.repos_dir)
            .field("git_base_url", &self.git_base_url)
            .field("remote_name", &self.remote_name)
            .field("tracking_remote", &self.tracking_remote)
            .field("primary_line", &self.primary_line)
            .field("kill_grace_secs", &self.kill_grace_secs)
            .field("migrate_from_copy", &self.migrate_from_copy)
            .field("ignore_history", &self.ignore_history)
            .field("no_stdlayout", &self.no_stdlayout)
            .field("skip_import", &self.skip_import)
            .finish()
    }
}
