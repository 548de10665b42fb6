//! Turn imported tracking refs into local branches and tags
//!
//! Purely local: no network access, and safe to re-run. A second pass over
//! the same repository only reports skips.

use tracing::{debug, info, warn};

use crate::{
    error::Result,
    repository::{RefMutation, RefQuery},
    types::{RefCategory, RefOutcome, ReconciledRef, ReconciliationReport, RemoteRef},
};

/// Branch the primary line ends up on after normalisation
pub const MAIN_BRANCH: &str = "main";
/// Default branch name the conversion engine leaves behind
pub const LEGACY_BRANCH: &str = "master";

/// Reconciles one repository's tracking refs into branches and tags
#[derive(Debug, Clone)]
pub struct RefReconciler {
    tracking_remote: String,
    primary_line: String,
    tag_message: String,
}

impl RefReconciler {
    /// Create a reconciler
    ///
    /// * `tracking_remote` - remote the import step filed refs under
    /// * `primary_line` - source name of the main development line
    /// * `tag_message` - annotation written into created tags
    pub fn new(
        tracking_remote: impl Into<String>,
        primary_line: impl Into<String>,
        tag_message: impl Into<String>,
    ) -> Self {
        Self {
            tracking_remote: tracking_remote.into(),
            primary_line: primary_line.into(),
            tag_message: tag_message.into(),
        }
    }

    /// Classify a full ref name with this reconciler's settings
    pub fn classify(&self, full_path: &str) -> Option<RemoteRef> {
        RemoteRef::classify(full_path, &self.tracking_remote, &self.primary_line)
    }

    /// Reconcile every tracking ref, then normalise the primary branch
    pub fn reconcile<R>(&self, repo: &R) -> Result<ReconciliationReport>
    where
        R: RefQuery + RefMutation + ?Sized,
    {
        let mut report = ReconciliationReport::default();

        for full_path in repo.tracking_refs(&self.tracking_remote)? {
            debug!("Processing ref: {}", full_path);
            let Some(remote_ref) = self.classify(&full_path) else {
                debug!("Ignoring ref {}", full_path);
                continue;
            };

            let outcome = self.apply(repo, &remote_ref)?;
            report.refs.push(ReconciledRef { remote_ref, outcome });
        }

        report.primary_renamed = normalize_primary_branch(repo)?;

        info!("Reconciliation finished: {}", report.summary());
        Ok(report)
    }

    fn apply<R>(&self, repo: &R, remote_ref: &RemoteRef) -> Result<RefOutcome>
    where
        R: RefQuery + RefMutation + ?Sized,
    {
        let name = remote_ref.local_name.as_str();

        if remote_ref.category == RefCategory::Tag {
            if repo.has_tag(name)? {
                debug!("Tag already exists: {}", name);
                return Ok(RefOutcome::TagAlreadyExists);
            }
            info!("Creating tag {} from {}", name, remote_ref.full_path);
            repo.create_tag(name, &remote_ref.full_path, &self.tag_message)?;
            return Ok(RefOutcome::TagCreated);
        }

        if repo.has_local_branch(name)? {
            warn!("Ignoring branch {} because it already exists", name);
            return Ok(RefOutcome::SkippedDuplicate);
        }

        if remote_ref.category == RefCategory::Trunk {
            warn!("Ignoring {} because it is already the default branch", name);
            return Ok(RefOutcome::SkippedTrunk);
        }

        info!("Creating branch {} from {}", name, remote_ref.full_path);
        repo.create_branch(name, &remote_ref.full_path)?;
        Ok(RefOutcome::Created)
    }
}

/// Rename `master` to `main` when only `master` exists
///
/// Returns whether a rename happened.
pub fn normalize_primary_branch<R>(repo: &R) -> Result<bool>
where
    R: RefQuery + RefMutation + ?Sized,
{
    if repo.has_local_branch(MAIN_BRANCH)? || !repo.has_local_branch(LEGACY_BRANCH)? {
        return Ok(false);
    }

    info!("Renaming branch {} to {}", LEGACY_BRANCH, MAIN_BRANCH);
    repo.rename_branch(LEGACY_BRANCH, MAIN_BRANCH)?;
    Ok(true)
}
