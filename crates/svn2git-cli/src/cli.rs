// Command line definition

use std::path::{Path, PathBuf};

use clap::Parser;
use svn2git_config::Overrides;

/// svn2git - migrate Subversion repositories to Git
#[derive(Parser, Debug)]
#[command(name = "svn2git")]
#[command(bin_name = "svn2git")]
#[command(about = "Migrate a batch of Subversion repositories to Git")]
#[command(
    long_about = "Migrate a batch of Subversion repositories to Git.\n\nEach row of the manifest is imported with git-svn, its branches and tags are\nmaterialised locally, and the result is pushed to <git-base-url><git_path>.git.\n\nSettings are read from svn2git.toml and SVN2GIT_* environment variables;\nflags override both."
)]
#[command(version)]
#[command(author = "svn2git Contributors")]
pub struct Cli {
    /// Username for the Subversion server
    #[arg(long, value_name = "USER")]
    pub svn_username: Option<String>,

    /// Password for the Subversion server
    #[arg(long, value_name = "PASSWORD")]
    pub svn_password: Option<String>,

    /// CSV manifest with svn_url, git_path and optional svn_revisions columns
    #[arg(long, value_name = "FILE")]
    pub svn_repos_file: Option<PathBuf>,

    /// Author mapping file passed to git-svn
    #[arg(long, value_name = "FILE")]
    pub svn_authors_file: Option<PathBuf>,

    /// Revision range for manifests without a svn_revisions column
    #[arg(long, value_name = "RANGE")]
    pub svn_revisions: Option<String>,

    /// Directory the local repositories are created under
    #[arg(long, value_name = "DIR")]
    pub git_repos_path: Option<PathBuf>,

    /// Prefix of the destination remote URL
    #[arg(long, value_name = "URL")]
    pub git_base_url: Option<String>,

    /// Import only the latest revision
    #[arg(long, conflicts_with = "migrate_from_copy")]
    pub ignore_history: bool,

    /// Source does not use the trunk/branches/tags layout
    #[arg(long)]
    pub no_stdlayout: bool,

    /// Import only since the source path was copied into existence
    #[arg(long)]
    pub migrate_from_copy: bool,

    /// Reuse existing local repositories instead of importing
    #[arg(long)]
    pub skip_import: bool,

    /// Configuration file (default: svn2git.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Flags that override file and environment settings
    pub fn overrides(&self) -> Overrides {
        Overrides::new()
            .set("svn_username", self.svn_username.clone())
            .set("svn_password", self.svn_password.clone())
            .set("manifest_path", path_value(self.svn_repos_file.as_deref()))
            .set("authors_file", path_value(self.svn_authors_file.as_deref()))
            .set("default_revisions", self.svn_revisions.clone())
            .set("repos_dir", path_value(self.git_repos_path.as_deref()))
            .set("git_base_url", self.git_base_url.clone())
            .flag("ignore_history", self.ignore_history)
            .flag("no_stdlayout", self.no_stdlayout)
            .flag("migrate_from_copy", self.migrate_from_copy)
            .flag("skip_import", self.skip_import)
    }
}

fn path_value(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().into_owned())
}
