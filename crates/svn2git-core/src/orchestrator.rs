//! Batch orchestration
//!
//! Each record runs pre-flight, range resolution, import, reconciliation and
//! publish in that order. A failure ends the record it happened in and the
//! batch continues with the next one.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use svn2git_config::MigrationConfig;
use svn2git_process::CommandRunner;
use svn2git_vcs::{BindingChange, GitRepository, RefReconciler, ReconciliationReport};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{MigrationError, Result};
use crate::import::{ImportOutcome, ImportRequest, ImportRunner, Layout};
use crate::interrupt::Interrupts;
use crate::manifest::MigrationRecord;
use crate::publish::PublishManager;
use crate::revision::{RevisionMode, RevisionRangeResolver};
use crate::svn::{Credentials, SourceRepository, SvnClient};

/// Exit code of a run whose records all migrated
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code of a run with failed or cancelled records
pub const EXIT_FAILURES: i32 = 1;
/// Exit code of a run aborted by the operator
pub const EXIT_ABORTED: i32 = 130;

/// What happened to one record
#[derive(Debug)]
pub struct RecordSummary {
    /// Import verdict; `None` when the import was skipped
    pub import: Option<ImportOutcome>,
    pub reconciliation: ReconciliationReport,
    pub binding: BindingChange,
}

/// Final state of one record
#[derive(Debug)]
pub enum RecordStatus {
    Migrated(RecordSummary),
    Failed(MigrationError),
    Cancelled,
}

impl RecordStatus {
    pub fn is_migrated(&self) -> bool {
        matches!(self, RecordStatus::Migrated(_))
    }
}

/// Outcome of one record in a batch
#[derive(Debug)]
pub struct RecordReport {
    pub record: MigrationRecord,
    pub status: RecordStatus,
}

/// Counts over a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals {
    pub migrated: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Records never started because the batch was aborted
    pub not_started: usize,
}

impl fmt::Display for BatchTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} migrated, {} failed, {} cancelled",
            self.migrated, self.failed, self.cancelled
        )?;
        if self.not_started > 0 {
            write!(f, ", {} not started", self.not_started)?;
        }
        Ok(())
    }
}

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<RecordReport>,
    /// True when the operator aborted the batch
    pub aborted: bool,
    /// Records left unprocessed after an abort
    pub not_started: usize,
}

impl BatchReport {
    pub fn totals(&self) -> BatchTotals {
        let mut totals = BatchTotals {
            not_started: self.not_started,
            ..Default::default()
        };
        for report in &self.records {
            match report.status {
                RecordStatus::Migrated(_) => totals.migrated += 1,
                RecordStatus::Failed(_) => totals.failed += 1,
                RecordStatus::Cancelled => totals.cancelled += 1,
            }
        }
        totals
    }

    /// Process exit code for this batch
    pub fn exit_code(&self) -> i32 {
        if self.aborted {
            EXIT_ABORTED
        } else if self.records.iter().all(|r| r.status.is_migrated()) {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURES
        }
    }
}

/// Drives a batch of records through the migration pipeline
pub struct MigrationOrchestrator<'a> {
    config: &'a MigrationConfig,
    runner: &'a dyn CommandRunner,
    interrupts: Interrupts,
}

impl<'a> MigrationOrchestrator<'a> {
    pub fn new(
        config: &'a MigrationConfig,
        runner: &'a dyn CommandRunner,
        interrupts: Interrupts,
    ) -> Self {
        Self {
            config,
            runner,
            interrupts,
        }
    }

    /// Create the directory local repositories live under
    pub fn prepare(&self) -> Result<PathBuf> {
        let dir = &self.config.repos_dir;
        if !dir.exists() {
            info!(path = %dir.display(), "Creating repositories directory");
            std::fs::create_dir_all(dir)?;
        }
        Ok(dir.clone())
    }

    /// Migrate every record in order
    pub async fn run_batch(&self, records: &[MigrationRecord]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, record) in records.iter().enumerate() {
            if self.interrupts.is_aborted() {
                report.not_started = records.len() - index;
                warn!(remaining = report.not_started, "Batch aborted");
                break;
            }

            let cancel = self.interrupts.begin_record();
            info!(
                url = %record.source_url,
                destination = %record.destination_name,
                "Migrating {} ({}/{})",
                record.destination_name,
                index + 1,
                records.len()
            );

            let outcome = self.migrate(record, &cancel).await;
            self.interrupts.end_record();
            let status = match outcome {
                Ok(summary) => {
                    info!(
                        destination = %record.destination_name,
                        "Migrated: {}",
                        summary.reconciliation.summary()
                    );
                    RecordStatus::Migrated(summary)
                }
                Err(MigrationError::Cancelled) => {
                    warn!(destination = %record.destination_name, "Migration cancelled");
                    RecordStatus::Cancelled
                }
                Err(e) => {
                    error!(destination = %record.destination_name, "Migration failed: {}", e);
                    RecordStatus::Failed(e)
                }
            };
            report.records.push(RecordReport {
                record: record.clone(),
                status,
            });
        }

        report.aborted = self.interrupts.is_aborted();
        info!(aborted = report.aborted, "Batch finished: {}", report.totals());
        report
    }

    /// Run the whole pipeline for one record
    pub async fn migrate(
        &self,
        record: &MigrationRecord,
        cancel: &CancellationToken,
    ) -> Result<RecordSummary> {
        let repo_dir = self.config.repo_dir(&record.destination_name);

        let import = if self.config.skip_import {
            info!(destination = %record.destination_name, "Skipping import");
            None
        } else {
            Some(self.import(record, repo_dir.clone(), cancel).await?)
        };

        if cancel.is_cancelled() {
            return Err(MigrationError::Cancelled);
        }

        let publisher = PublishManager::new(
            self.runner,
            self.config.remote_name.as_str(),
            self.config.git_base_url.as_str(),
            self.config.kill_grace(),
        );

        // The repository handle is not shared across tasks; keep it out of the
        // awaited push below.
        let (reconciliation, binding) = {
            let repo = GitRepository::open(&repo_dir)?;
            let reconciler = RefReconciler::new(
                self.config.tracking_remote.as_str(),
                self.config.primary_line.as_str(),
                self.config.tag_message.as_str(),
            );
            let reconciliation = reconciler.reconcile(&repo)?;
            let binding = publisher.bind_remote(&repo, &record.destination_name)?;
            (reconciliation, binding)
        };

        publisher.push(&repo_dir, cancel).await?;

        Ok(RecordSummary {
            import,
            reconciliation,
            binding,
        })
    }

    async fn import(
        &self,
        record: &MigrationRecord,
        destination: PathBuf,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome> {
        let source = SvnClient::new(
            self.runner,
            record.source_url.as_str(),
            Credentials::new(
                self.config.svn_username.as_str(),
                self.config.svn_password.as_str(),
            ),
            self.config.kill_grace(),
        );
        source.check_available(cancel).await?;

        let mode = RevisionMode::select(
            record.revision_range.as_deref(),
            self.config.migrate_from_copy,
            self.config.ignore_history,
        )?;
        let range = RevisionRangeResolver::resolve(&source, &mode, cancel).await?;

        let request = ImportRequest {
            source_url: record.source_url.clone(),
            destination,
            range,
            authors_file: self.config.authors_file.clone(),
            username: self.config.svn_username.clone(),
            layout: if self.config.no_stdlayout {
                Layout::Flat
            } else {
                Layout::Standard
            },
        };

        match ImportRunner::new(self.runner, self.config.kill_grace())
            .import(&request, cancel)
            .await?
        {
            ImportOutcome::Failed { code, output } => {
                Err(MigrationError::ImportFailed { code, output })
            }
            outcome => Ok(outcome),
        }
    }
}
