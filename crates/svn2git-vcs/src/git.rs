//! Git repository implementation

use std::path::{Path, PathBuf};

use git2::{
    BranchType, ErrorCode, ObjectType, ReferenceType, Repository as Git2Repository, Signature,
};
use tracing::{debug, trace};

use crate::{
    error::{Result, VcsError},
    repository::{RefMutation, RefQuery, RemoteConfig},
    types::tracking_suffix,
};

/// Identity used for annotated tags when the repository has none configured
const FALLBACK_NAME: &str = "svn2git";
const FALLBACK_EMAIL: &str = "svn2git@localhost";

/// Git repository implementation
pub struct GitRepository {
    /// The underlying git2 repository
    repo: Git2Repository,
    /// Repository root path
    root_path: PathBuf,
}

impl GitRepository {
    /// Open a Git repository at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening Git repository at: {}", path.display());

        let repo = Git2Repository::open(path).map_err(|e| {
            debug!("Failed to open repository: {}", e);
            VcsError::RepositoryNotFound {
                path: path.display().to_string(),
            }
        })?;

        let root_path = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();

        debug!(
            "Successfully opened Git repository at: {}",
            root_path.display()
        );

        Ok(Self { repo, root_path })
    }

    /// Check if a directory contains a Git repository
    pub fn is_git_repository<P: AsRef<Path>>(path: P) -> bool {
        Git2Repository::open(path).is_ok()
    }

    /// Repository root path
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Borrow the underlying git2 handle
    pub fn inner(&self) -> &Git2Repository {
        &self.repo
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(e) => {
                trace!("No configured identity ({}), using fallback", e);
                Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?)
            }
        }
    }

    fn peel_ref(&self, target_ref: &str) -> Result<git2::Object<'_>> {
        let reference = self.repo.find_reference(target_ref).map_err(|e| {
            debug!("Failed to resolve {}: {}", target_ref, e);
            VcsError::InvalidReference {
                name: target_ref.to_string(),
            }
        })?;
        reference
            .peel(ObjectType::Commit)
            .map_err(|_| VcsError::InvalidReference {
                name: target_ref.to_string(),
            })
    }
}

/// Map git2 "not found" to `false`, everything else to an error
fn exists<T>(lookup: std::result::Result<T, git2::Error>) -> Result<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

impl RefQuery for GitRepository {
    fn tracking_refs(&self, remote: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for reference in self.repo.references()? {
            let reference = reference?;
            if reference.kind() == Some(ReferenceType::Symbolic) {
                continue;
            }
            if let Some(name) = reference.name() {
                if tracking_suffix(name, remote).is_some() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        debug!("Found {} refs under remote {}", names.len(), remote);
        Ok(names)
    }

    fn has_local_branch(&self, name: &str) -> Result<bool> {
        exists(self.repo.find_branch(name, BranchType::Local))
    }

    fn has_tag(&self, name: &str) -> Result<bool> {
        exists(self.repo.find_reference(&format!("refs/tags/{}", name)))
    }

    fn branch_target(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(branch) => Ok(branch.get().target().map(|oid| oid.to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn local_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn tags(&self) -> Result<Vec<String>> {
        let names = self.repo.tag_names(None)?;
        Ok(names.iter().flatten().map(str::to_string).collect())
    }
}

impl RefMutation for GitRepository {
    fn create_branch(&self, name: &str, target_ref: &str) -> Result<()> {
        debug!("Creating branch {} from {}", name, target_ref);

        let commit = self.peel_ref(target_ref)?.peel_to_commit()?;
        self.repo.branch(name, &commit, false)?;
        Ok(())
    }

    fn create_tag(&self, name: &str, target_ref: &str, message: &str) -> Result<()> {
        debug!("Creating tag {} from {}", name, target_ref);

        let object = self.peel_ref(target_ref)?;
        let signature = self.signature()?;
        self.repo.tag(name, &object, &signature, message, false)?;
        Ok(())
    }

    fn rename_branch(&self, from: &str, to: &str) -> Result<()> {
        debug!("Renaming branch {} to {}", from, to);

        let mut branch = self.repo.find_branch(from, BranchType::Local)?;
        branch.rename(to, false)?;
        Ok(())
    }
}

impl RemoteConfig for GitRepository {
    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            // a remote without a readable URL still exists and must be repointed
            Ok(remote) => Ok(Some(remote.url().unwrap_or_default().to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.repo.remote(name, url)?;
        Ok(())
    }

    fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
        self.repo.remote_set_url(name, url)?;
        Ok(())
    }

    fn remote_names(&self) -> Result<Vec<String>> {
        let names = self.repo.remotes()?;
        Ok(names.iter().flatten().map(str::to_string).collect())
    }
}
