//! Migration manifest reader
//!
//! The manifest is a CSV file with a header row naming at least `svn_url`
//! and `git_path`, and optionally `svn_revisions`. Rows whose first column
//! begins with `#` are comments. Rows that cannot be read are skipped with a
//! warning instead of failing the batch.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MigrationError, Result};

const SOURCE_COLUMN: &str = "svn_url";
const DESTINATION_COLUMN: &str = "git_path";
const REVISIONS_COLUMN: &str = "svn_revisions";

/// One repository to migrate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Location of the source repository
    pub source_url: String,
    /// Name of the destination repository, also its local directory name
    pub destination_name: String,
    /// Revision range to import; `None` lets the run's mode decide
    pub revision_range: Option<String>,
}

impl MigrationRecord {
    /// Create a record
    pub fn new(
        source_url: impl Into<String>,
        destination_name: impl Into<String>,
        revision_range: Option<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            destination_name: destination_name.into(),
            revision_range,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ManifestRow {
    svn_url: String,
    git_path: String,
    #[serde(default)]
    svn_revisions: Option<String>,
}

/// Read the manifest at `path`
///
/// `default_revisions` applies to every row when the manifest has no
/// revisions column. A present but empty cell means "no explicit range".
pub fn read_manifest(path: &Path, default_revisions: &str) -> Result<Vec<MigrationRecord>> {
    let file = File::open(path).map_err(|e| {
        MigrationError::Manifest(format!("cannot open {}: {}", path.display(), e))
    })?;
    parse_manifest(file, default_revisions)
}

/// Parse manifest rows from any reader
pub fn parse_manifest<R: Read>(reader: R, default_revisions: &str) -> Result<Vec<MigrationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for required in [SOURCE_COLUMN, DESTINATION_COLUMN] {
        if !headers.iter().any(|h| h == required) {
            return Err(MigrationError::Manifest(format!(
                "missing required column '{}'",
                required
            )));
        }
    }
    let has_revisions = headers.iter().any(|h| h == REVISIONS_COLUMN);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable manifest row");
                continue;
            }
        };

        if row.get(0).is_some_and(|first| first.starts_with('#')) {
            debug!(line, "Skipping comment row");
            continue;
        }
        if row.len() != headers.len() {
            warn!(
                line,
                expected = headers.len(),
                found = row.len(),
                "Skipping manifest row with wrong column count"
            );
            continue;
        }

        let parsed: ManifestRow = match row.deserialize(Some(&headers)) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(line, error = %e, "Skipping malformed manifest row");
                continue;
            }
        };

        if parsed.svn_url.is_empty() || parsed.git_path.is_empty() {
            warn!(line, "Skipping manifest row with empty source or destination");
            continue;
        }

        let revision_range = if has_revisions {
            parsed.svn_revisions.filter(|r| !r.is_empty())
        } else {
            Some(default_revisions.to_string())
        };

        records.push(MigrationRecord {
            source_url: parsed.svn_url,
            destination_name: parsed.git_path,
            revision_range,
        });
    }

    debug!(count = records.len(), "Manifest parsed");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<MigrationRecord> {
        parse_manifest(text.as_bytes(), "BASE:HEAD").unwrap()
    }

    #[test]
    fn test_parse_basic_rows() {
        let records = parse(
            "svn_url,git_path,svn_revisions\n\
             https://svn.example.com/a,a,100:200\n\
             https://svn.example.com/b,b,\n",
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source_url, "https://svn.example.com/a");
        assert_eq!(records[0].destination_name, "a");
        assert_eq!(records[0].revision_range.as_deref(), Some("100:200"));
        assert_eq!(records[1].revision_range, None);
    }

    #[test]
    fn test_missing_revisions_column_uses_default() {
        let records = parse("svn_url,git_path\nhttps://svn.example.com/a,a\n");
        assert_eq!(records[0].revision_range.as_deref(), Some("BASE:HEAD"));
    }

    #[test]
    fn test_comment_rows_skipped() {
        let records = parse(
            "svn_url,git_path\n\
             # https://svn.example.com/old,old\n\
             https://svn.example.com/a,a\n",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].destination_name, "a");
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let records = parse(
            "svn_url,git_path\n\
             https://svn.example.com/a\n\
             https://svn.example.com/b,b,extra\n\
             ,c\n\
             https://svn.example.com/d,d\n",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].destination_name, "d");
    }

    #[test]
    fn test_columns_in_any_order() {
        let records = parse("git_path,svn_url\nproj,https://svn.example.com/p\n");
        assert_eq!(records[0].source_url, "https://svn.example.com/p");
        assert_eq!(records[0].destination_name, "proj");
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse_manifest("svn_url,name\nx,y\n".as_bytes(), "BASE:HEAD").unwrap_err();
        assert!(matches!(err, MigrationError::Manifest(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_manifest(Path::new("/nonexistent/to_migrate.csv"), "BASE:HEAD").unwrap_err();
        assert!(matches!(err, MigrationError::Manifest(_)));
    }
}
