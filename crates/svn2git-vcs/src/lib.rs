//! svn2git VCS layer
//!
//! Local git repository access for the migration engine:
//! - Opening the repository produced by the import step
//! - Classifying its remote-tracking refs (branch, tag, primary line)
//! - Reconciling them into local branches and tags
//! - Binding the single outbound remote
//!
//! # Examples
//!
//! ```ignore
//! use svn2git_vcs::{GitRepository, RefReconciler, RemoteBinding};
//!
//! let repo = GitRepository::open("git_repos/project")?;
//!
//! let reconciler = RefReconciler::new("origin", "trunk", "Tag created by svn2git");
//! let report = reconciler.reconcile(&repo)?;
//! println!("{}", report.summary());
//!
//! RemoteBinding::derive("origin", "https://github.com/acme/", "project").ensure(&repo)?;
//! ```

pub mod error;
pub mod git;
pub mod reconcile;
pub mod remote;
pub mod repository;
pub mod types;

pub use error::{Result, VcsError};
pub use git::GitRepository;
pub use reconcile::{normalize_primary_branch, RefReconciler, LEGACY_BRANCH, MAIN_BRANCH};
pub use remote::{BindingChange, RemoteBinding};
pub use repository::{RefMutation, RefQuery, RemoteConfig};
pub use types::{RefCategory, RefOutcome, ReconciledRef, ReconciliationReport, RemoteRef};
