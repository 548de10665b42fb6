//! svn2git migration engine
//!
//! Moves a batch of Subversion repositories to Git:
//! - [`manifest`] reads the list of repositories to migrate
//! - [`svn`] and [`revision`] decide which revisions to import
//! - [`import`] runs `git svn clone` under process supervision
//! - reconciliation turns tracking refs into local branches and tags
//! - [`publish`] binds the outbound remote and pushes
//! - [`orchestrator`] drives the batch, isolating failures per record
//!
//! # Examples
//!
//! ```ignore
//! use svn2git_core::{read_manifest, Interrupts, MigrationOrchestrator};
//! use svn2git_process::ProcessSupervisor;
//!
//! let records = read_manifest(&config.manifest_path, &config.default_revisions)?;
//! let interrupts = Interrupts::new();
//! interrupts.listen_for_ctrl_c();
//!
//! let supervisor = ProcessSupervisor::new();
//! let migrator = MigrationOrchestrator::new(&config, &supervisor, interrupts);
//! migrator.prepare()?;
//! let report = migrator.run_batch(&records).await;
//! std::process::exit(report.exit_code());
//! ```

pub mod error;
pub mod import;
pub mod interrupt;
pub mod manifest;
pub mod orchestrator;
pub mod publish;
pub mod revision;
pub mod svn;

pub use error::{MigrationError, PublishStep, Result};
pub use import::{ImportOutcome, ImportRequest, ImportRunner, Layout, ALREADY_EXISTS_EXIT_CODE};
pub use interrupt::{InterruptEffect, Interrupts};
pub use manifest::{parse_manifest, read_manifest, MigrationRecord};
pub use orchestrator::{
    BatchReport, BatchTotals, MigrationOrchestrator, RecordReport, RecordStatus, RecordSummary,
    EXIT_ABORTED, EXIT_FAILURES, EXIT_SUCCESS,
};
pub use publish::PublishManager;
pub use revision::{RevisionBound, RevisionMode, RevisionRange, RevisionRangeResolver};
pub use svn::{Credentials, SourceRepository, SvnClient};
