//! Common types for ref reconciliation

use serde::{Deserialize, Serialize};

/// Path segment under which the conversion engine files tags
pub const TAGS_SEGMENT: &str = "tags";

/// Kind of a remote-tracking reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefCategory {
    /// An ordinary branch
    Branch,
    /// A tag imported as a tracking ref
    Tag,
    /// The historical primary line (already on the default branch)
    Trunk,
}

/// A reference found under the tracking remote
///
/// Read-only view over repository state; reconciliation acts on it and
/// throws it away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRef {
    /// Full reference name, e.g. `refs/remotes/origin/tags/v1.0`
    pub full_path: String,
    /// Derived category
    pub category: RefCategory,
    /// Name the ref gets locally: a branch name, or `tags/<name>` for tags
    pub local_name: String,
}

impl RemoteRef {
    /// Classify a full reference name
    ///
    /// Returns `None` when the ref is not under `remotes/<tracking_remote>/`
    /// or names the remote's symbolic `HEAD`.
    ///
    /// # Examples
    ///
    /// ```
    /// use svn2git_vcs::{RefCategory, RemoteRef};
    ///
    /// let tag = RemoteRef::classify("refs/remotes/origin/tags/v1.0", "origin", "trunk").unwrap();
    /// assert_eq!(tag.category, RefCategory::Tag);
    /// assert_eq!(tag.local_name, "tags/v1.0");
    ///
    /// let trunk = RemoteRef::classify("refs/remotes/origin/trunk", "origin", "trunk").unwrap();
    /// assert_eq!(trunk.category, RefCategory::Trunk);
    ///
    /// assert!(RemoteRef::classify("refs/heads/main", "origin", "trunk").is_none());
    /// ```
    pub fn classify(full_path: &str, tracking_remote: &str, primary_line: &str) -> Option<Self> {
        tracking_suffix(full_path, tracking_remote)?;

        let segments: Vec<&str> = full_path.split('/').collect();
        let last = *segments.last()?;
        if last.is_empty() || last == "HEAD" {
            return None;
        }

        let second_to_last = segments.len().checked_sub(2).map(|i| segments[i]);
        let (category, local_name) = if second_to_last == Some(TAGS_SEGMENT) {
            (RefCategory::Tag, format!("{}/{}", TAGS_SEGMENT, last))
        } else if last == primary_line {
            (RefCategory::Trunk, last.to_string())
        } else {
            (RefCategory::Branch, last.to_string())
        };

        Some(Self {
            full_path: full_path.to_string(),
            category,
            local_name,
        })
    }
}

/// Part of `full_path` after `remotes/<remote>/`, if it is under that remote
pub fn tracking_suffix<'a>(full_path: &'a str, remote: &str) -> Option<&'a str> {
    let marker = format!("remotes/{}/", remote);
    let start = full_path.find(&marker)?;
    // the marker must start a path segment
    if start > 0 && !full_path[..start].ends_with('/') {
        return None;
    }
    let suffix = &full_path[start + marker.len()..];
    (!suffix.is_empty()).then_some(suffix)
}

/// What reconciliation did with one reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefOutcome {
    /// A new local branch was created
    Created,
    /// A local branch with that name already existed and was left alone
    SkippedDuplicate,
    /// The primary line, carried by the default branch instead
    SkippedTrunk,
    /// A new tag was created
    TagCreated,
    /// A tag with that name already existed
    TagAlreadyExists,
}

impl RefOutcome {
    /// Whether the outcome changed repository state
    pub fn is_change(self) -> bool {
        matches!(self, RefOutcome::Created | RefOutcome::TagCreated)
    }
}

/// One reconciled reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRef {
    /// The reference as classified
    pub remote_ref: RemoteRef,
    /// What happened to it
    pub outcome: RefOutcome,
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Per-ref outcomes in walk order
    pub refs: Vec<ReconciledRef>,
    /// Whether `master` was renamed to `main`
    pub primary_renamed: bool,
}

impl ReconciliationReport {
    /// Number of refs with the given outcome
    pub fn count(&self, outcome: RefOutcome) -> usize {
        self.refs.iter().filter(|r| r.outcome == outcome).count()
    }

    /// True when the pass changed nothing
    pub fn is_noop(&self) -> bool {
        !self.primary_renamed && !self.refs.iter().any(|r| r.outcome.is_change())
    }

    /// Short human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} branch(es) created, {} tag(s) created, {} duplicate(s), {} trunk, {} existing tag(s){}",
            self.count(RefOutcome::Created),
            self.count(RefOutcome::TagCreated),
            self.count(RefOutcome::SkippedDuplicate),
            self.count(RefOutcome::SkippedTrunk),
            self.count(RefOutcome::TagAlreadyExists),
            if self.primary_renamed { ", master renamed to main" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_branch() {
        let r = RemoteRef::classify("refs/remotes/origin/feature-x", "origin", "trunk").unwrap();
        assert_eq!(r.category, RefCategory::Branch);
        assert_eq!(r.local_name, "feature-x");
    }

    #[test]
    fn test_classify_ignores_other_remotes() {
        assert!(RemoteRef::classify("refs/remotes/upstream/feature", "origin", "trunk").is_none());
        assert!(RemoteRef::classify("refs/remotes/origin2/feature", "origin", "trunk").is_none());
        assert!(RemoteRef::classify("refs/tags/v1", "origin", "trunk").is_none());
    }

    #[test]
    fn test_classify_skips_symbolic_head() {
        assert!(RemoteRef::classify("refs/remotes/origin/HEAD", "origin", "trunk").is_none());
    }

    #[test]
    fn test_classify_branch_named_tags() {
        let r = RemoteRef::classify("refs/remotes/origin/tags", "origin", "trunk").unwrap();
        assert_eq!(r.category, RefCategory::Branch);
        assert_eq!(r.local_name, "tags");
    }

    #[test]
    fn test_classify_custom_primary_line() {
        let r = RemoteRef::classify("refs/remotes/origin/mainline", "origin", "mainline").unwrap();
        assert_eq!(r.category, RefCategory::Trunk);
        let r = RemoteRef::classify("refs/remotes/origin/trunk", "origin", "mainline").unwrap();
        assert_eq!(r.category, RefCategory::Branch);
    }

    #[test]
    fn test_tracking_suffix() {
        assert_eq!(
            tracking_suffix("refs/remotes/origin/tags/v1", "origin"),
            Some("tags/v1")
        );
        assert_eq!(tracking_suffix("refs/remotes/origin/", "origin"), None);
        assert_eq!(tracking_suffix("refs/xremotes/origin/a", "origin"), None);
    }

    #[test]
    fn test_report_summary_and_noop() {
        let mut report = ReconciliationReport::default();
        assert!(report.is_noop());

        report.refs.push(ReconciledRef {
            remote_ref: RemoteRef::classify("refs/remotes/origin/b1", "origin", "trunk").unwrap(),
            outcome: RefOutcome::Created,
        });
        report.refs.push(ReconciledRef {
            remote_ref: RemoteRef::classify("refs/remotes/origin/trunk", "origin", "trunk").unwrap(),
            outcome: RefOutcome::SkippedTrunk,
        });

        assert!(!report.is_noop());
        assert_eq!(report.count(RefOutcome::Created), 1);
        assert_eq!(
            report.summary(),
            "1 branch(es) created, 0 tag(s) created, 0 duplicate(s), 1 trunk, 0 existing tag(s)"
        );
    }
}
