//! Revision ranges and how they are resolved against the source

use std::fmt;
use std::str::FromStr;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{MigrationError, Result};
use crate::svn::SourceRepository;

/// One end of a revision range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionBound {
    /// The first revision the source has
    Base,
    /// The newest revision the source has
    Head,
    /// A concrete revision number
    Number(u64),
}

impl fmt::Display for RevisionBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionBound::Base => write!(f, "BASE"),
            RevisionBound::Head => write!(f, "HEAD"),
            RevisionBound::Number(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for RevisionBound {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("BASE") {
            Ok(RevisionBound::Base)
        } else if s.eq_ignore_ascii_case("HEAD") {
            Ok(RevisionBound::Head)
        } else {
            s.parse::<u64>()
                .map(RevisionBound::Number)
                .map_err(|_| format!("'{}' is not BASE, HEAD or a revision number", s))
        }
    }
}

/// Inclusive range of source revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevisionRange {
    pub lower: RevisionBound,
    pub upper: RevisionBound,
}

impl RevisionRange {
    /// Build a range, rejecting bounds in the wrong order
    ///
    /// `BASE` sorts before every revision number and `HEAD` after every one.
    pub fn new(lower: RevisionBound, upper: RevisionBound) -> Result<Self> {
        use RevisionBound::{Base, Head, Number};

        let reversed = match (lower, upper) {
            (Number(l), Number(u)) => l > u,
            (Head, Base) | (Head, Number(_)) | (Number(_), Base) => true,
            _ => false,
        };
        if reversed {
            return Err(MigrationError::InvalidRange {
                range: format!("{}:{}", lower, upper),
                reason: "lower bound is after upper bound".to_string(),
            });
        }
        Ok(Self { lower, upper })
    }

    /// Range between two revision numbers
    pub fn numbers(lower: u64, upper: u64) -> Result<Self> {
        Self::new(RevisionBound::Number(lower), RevisionBound::Number(upper))
    }

    /// Parse `LOWER:UPPER`, or a single bound meaning just that revision
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: String| MigrationError::InvalidRange {
            range: text.to_string(),
            reason,
        };

        let (lower, upper) = match text.split_once(':') {
            Some((lower, upper)) => (lower, upper),
            None => (text, text),
        };
        let lower = lower.parse::<RevisionBound>().map_err(invalid)?;
        let upper = upper.parse::<RevisionBound>().map_err(invalid)?;
        Self::new(lower, upper)
    }
}

impl fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower, self.upper)
    }
}

/// How the import range of a record is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionMode {
    /// From the first revision up to the latest one
    FullHistory,
    /// From the revision the path was copied into existence up to the latest one
    FromBranchPoint,
    /// The latest revision and the one before it
    LatestOnly,
    /// Caller-supplied range, used as given
    Explicit(RevisionRange),
}

impl RevisionMode {
    /// Pick the mode for a record
    ///
    /// A raised mode flag wins over the record's own range; an empty record
    /// range falls back to full history.
    pub fn select(
        record_range: Option<&str>,
        migrate_from_copy: bool,
        ignore_history: bool,
    ) -> Result<Self> {
        if ignore_history {
            return Ok(RevisionMode::LatestOnly);
        }
        if migrate_from_copy {
            return Ok(RevisionMode::FromBranchPoint);
        }
        match record_range.map(str::trim).filter(|r| !r.is_empty()) {
            Some(range) => Ok(RevisionMode::Explicit(RevisionRange::parse(range)?)),
            None => Ok(RevisionMode::FullHistory),
        }
    }
}

/// Turns a [`RevisionMode`] into a concrete range
pub struct RevisionRangeResolver;

impl RevisionRangeResolver {
    /// Resolve `mode` by querying `source` where needed
    pub async fn resolve<S>(
        source: &S,
        mode: &RevisionMode,
        cancel: &CancellationToken,
    ) -> Result<RevisionRange>
    where
        S: SourceRepository + ?Sized,
    {
        let range = match mode {
            RevisionMode::Explicit(range) => *range,
            RevisionMode::FullHistory => {
                let latest = source.latest_revision(cancel).await?;
                RevisionRange::new(RevisionBound::Base, RevisionBound::Number(latest))?
            }
            RevisionMode::FromBranchPoint => {
                let branch_point = source.branch_point_revision(cancel).await?;
                let latest = source.latest_revision(cancel).await?;
                RevisionRange::numbers(branch_point, latest)?
            }
            RevisionMode::LatestOnly => {
                let latest = source.latest_revision(cancel).await?;
                RevisionRange::numbers(latest.saturating_sub(1), latest)?
            }
        };
        debug!(?mode, range = %range, "Revision range resolved");
        Ok(range)
    }
}
