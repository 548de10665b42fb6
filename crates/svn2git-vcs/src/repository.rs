//! Repository traits
//!
//! Split by what callers need, in the same spirit as a query/mutation split:
//! - `RefQuery`: read-only lookups of branches, tags and tracking refs
//! - `RefMutation`: creating and renaming branches and tags
//! - `RemoteConfig`: reading and writing remote URLs
//!
//! `RefReconciler` only needs the first two; remote binding only the third.

use crate::error::Result;

/// Read-only reference lookups
pub trait RefQuery {
    /// Full names of all non-symbolic refs under `remotes/<remote>/`
    fn tracking_refs(&self, remote: &str) -> Result<Vec<String>>;

    /// Whether a local branch with this name exists
    fn has_local_branch(&self, name: &str) -> Result<bool>;

    /// Whether a tag with this name exists
    fn has_tag(&self, name: &str) -> Result<bool>;

    /// Commit id a local branch points at
    fn branch_target(&self, name: &str) -> Result<Option<String>>;

    /// Names of all local branches
    fn local_branches(&self) -> Result<Vec<String>>;

    /// Names of all tags
    fn tags(&self) -> Result<Vec<String>>;
}

/// Reference writes
pub trait RefMutation {
    /// Create a local branch at the commit `target_ref` resolves to
    ///
    /// Never overwrites an existing branch.
    fn create_branch(&self, name: &str, target_ref: &str) -> Result<()>;

    /// Create an annotated tag at the commit `target_ref` resolves to
    fn create_tag(&self, name: &str, target_ref: &str, message: &str) -> Result<()>;

    /// Rename a local branch, keeping its upstream configuration
    fn rename_branch(&self, from: &str, to: &str) -> Result<()>;
}

/// Remote configuration
pub trait RemoteConfig {
    /// URL of the named remote, `None` if no such remote exists
    fn remote_url(&self, name: &str) -> Result<Option<String>>;

    /// Add a remote
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Change the URL of an existing remote
    fn set_remote_url(&self, name: &str, url: &str) -> Result<()>;

    /// Names of all configured remotes
    fn remote_names(&self) -> Result<Vec<String>>;
}
