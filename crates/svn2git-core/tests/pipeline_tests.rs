//! Batch pipeline against scripted tools and real local repositories

mod common;

use common::*;
use git2::Repository;
use svn2git_core::{
    ImportOutcome, Interrupts, MigrationError, MigrationOrchestrator, MigrationRecord,
    PublishStep, RecordStatus, EXIT_ABORTED, EXIT_FAILURES, EXIT_SUCCESS,
};
use svn2git_process::{ProcessError, ProcessOutput};
use svn2git_vcs::{BindingChange, RefOutcome};
use tempfile::TempDir;

fn record(name: &str) -> MigrationRecord {
    MigrationRecord::new(format!("https://svn.example.com/{}", name), name, None)
}

/// Runner for a healthy source at revision 100 whose import seeds the destination
fn healthy_runner() -> ScriptedRunner {
    ScriptedRunner::new(|config| {
        if is_latest_query(config) {
            exited(0, "100")
        } else if is_clone(config) {
            seed_import(clone_destination(config));
            exited(0, "r1 = abc (refs/remotes/origin/trunk)")
        } else {
            ok()
        }
    })
}

#[tokio::test]
async fn test_record_runs_full_pipeline() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir.path().join("repos"));
    let runner = healthy_runner();
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());

    migrator.prepare().unwrap();
    let report = migrator.run_batch(&[record("proj")]).await;

    assert_eq!(report.exit_code(), EXIT_SUCCESS);
    let RecordStatus::Migrated(summary) = &report.records[0].status else {
        panic!("unexpected status {:?}", report.records[0].status);
    };
    assert_eq!(summary.import, Some(ImportOutcome::Success));
    assert_eq!(summary.binding, BindingChange::Created);
    assert_eq!(summary.reconciliation.count(RefOutcome::Created), 1);
    assert_eq!(summary.reconciliation.count(RefOutcome::TagCreated), 1);
    assert!(summary.reconciliation.primary_renamed);

    let calls = runner.calls();
    assert_eq!(calls.len(), 5);
    assert!(calls[0].ends_with("info https://svn.example.com/proj"));
    assert!(calls[1].contains("--show-item last-changed-revision"));
    assert!(calls[2].contains("--stdlayout --revision=BASE:100"));
    assert!(calls[3].ends_with("push origin --all"));
    assert!(calls[4].ends_with("push origin --tags"));

    let raw = Repository::open(dir.path().join("repos/proj")).unwrap();
    assert!(raw.find_branch("main", git2::BranchType::Local).is_ok());
    assert!(raw.find_branch("feature", git2::BranchType::Local).is_ok());
    assert!(raw.find_reference("refs/tags/tags/v1.0").is_ok());
    assert_eq!(
        raw.find_remote("origin").unwrap().url(),
        Some("https://git.example.com/acme/proj.git")
    );
}

#[tokio::test]
async fn test_failed_record_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let runner = ScriptedRunner::new(|config| {
        let broken = config.args.iter().any(|a| a.ends_with("/broken"));
        if broken {
            exited(1, "svn: E170013: Unable to connect to a repository")
        } else if is_latest_query(config) {
            exited(0, "7")
        } else if is_clone(config) {
            seed_import(clone_destination(config));
            ok()
        } else {
            ok()
        }
    });
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());

    let report = migrator
        .run_batch(&[record("broken"), record("healthy")])
        .await;

    assert!(matches!(
        report.records[0].status,
        RecordStatus::Failed(MigrationError::SourceUnavailable { .. })
    ));
    assert!(report.records[1].status.is_migrated());
    assert_eq!(report.exit_code(), EXIT_FAILURES);
    assert_eq!(runner.calls_matching("svn clone"), 1);
}

#[tokio::test]
async fn test_existing_destination_is_reused() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    seed_import(&dir.path().join("proj"));

    let runner = ScriptedRunner::new(|config| {
        if is_latest_query(config) {
            exited(0, "100")
        } else if is_clone(config) {
            exited(128, "fatal: destination path 'proj' already exists")
        } else {
            ok()
        }
    });
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    let report = migrator.run_batch(&[record("proj")]).await;

    let RecordStatus::Migrated(summary) = &report.records[0].status else {
        panic!("unexpected status {:?}", report.records[0].status);
    };
    assert_eq!(summary.import, Some(ImportOutcome::AlreadyExists));
    assert_eq!(runner.calls_matching("push"), 2);
}

#[tokio::test]
async fn test_import_failure_stops_record_before_publish() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let runner = ScriptedRunner::new(|config| {
        if is_latest_query(config) {
            exited(0, "100")
        } else if is_clone(config) {
            exited(1, "Author: bob not defined in authors.txt")
        } else {
            ok()
        }
    });
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    let report = migrator.run_batch(&[record("proj")]).await;

    match &report.records[0].status {
        RecordStatus::Failed(MigrationError::ImportFailed { code, output }) => {
            assert_eq!(*code, Some(1));
            assert!(output.contains("not defined in authors.txt"));
        }
        other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(runner.calls_matching("push"), 0);
}

#[tokio::test]
async fn test_mode_flags_shape_import_range() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.migrate_from_copy = true;
    config.no_stdlayout = true;

    let runner = ScriptedRunner::new(|config| {
        if is_latest_query(config) {
            exited(0, "100")
        } else if is_log_query(config) {
            exited(0, "r100 | a | d\nr40 | b | d")
        } else if is_clone(config) {
            seed_import(clone_destination(config));
            ok()
        } else {
            ok()
        }
    });
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    let explicit = MigrationRecord::new("https://svn.example.com/p", "p", Some("1:2".to_string()));
    migrator.run_batch(&[explicit]).await;

    let clone = runner
        .calls()
        .into_iter()
        .find(|c| c.contains("svn clone"))
        .unwrap();
    assert!(clone.contains("--revision=40:100"));
    assert!(!clone.contains("--stdlayout"));
}

#[tokio::test]
async fn test_skip_import_reconciles_existing_repository() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.skip_import = true;
    seed_import(&dir.path().join("proj"));

    let runner = ScriptedRunner::new(|_| ok());
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    let report = migrator.run_batch(&[record("proj")]).await;

    let RecordStatus::Migrated(summary) = &report.records[0].status else {
        panic!("unexpected status {:?}", report.records[0].status);
    };
    assert_eq!(summary.import, None);
    assert_eq!(runner.calls_matching("svn "), 0);
    assert_eq!(runner.calls_matching("push"), 2);
}

#[tokio::test]
async fn test_second_publish_reuses_remote() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.skip_import = true;
    seed_import(&dir.path().join("proj"));

    let runner = ScriptedRunner::new(|_| ok());
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    migrator.run_batch(&[record("proj")]).await;
    let report = migrator.run_batch(&[record("proj")]).await;

    let RecordStatus::Migrated(summary) = &report.records[0].status else {
        panic!("unexpected status {:?}", report.records[0].status);
    };
    assert_eq!(summary.binding, BindingChange::Unchanged { exact: true });
    assert!(summary.reconciliation.is_noop());

    let raw = Repository::open(dir.path().join("proj")).unwrap();
    assert_eq!(raw.remotes().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stale_remote_is_repointed() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.skip_import = true;
    seed_import(&dir.path().join("proj"));
    Repository::open(dir.path().join("proj"))
        .unwrap()
        .remote("origin", "https://old.example.com/proj.git")
        .unwrap();

    let runner = ScriptedRunner::new(|_| ok());
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    let report = migrator.run_batch(&[record("proj")]).await;

    let RecordStatus::Migrated(summary) = &report.records[0].status else {
        panic!("unexpected status {:?}", report.records[0].status);
    };
    assert_eq!(
        summary.binding,
        BindingChange::Updated {
            previous: "https://old.example.com/proj.git".to_string()
        }
    );
    let raw = Repository::open(dir.path().join("proj")).unwrap();
    assert_eq!(
        raw.find_remote("origin").unwrap().url(),
        Some("https://git.example.com/acme/proj.git")
    );
}

#[tokio::test]
async fn test_branch_push_failure_skips_tags() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.skip_import = true;
    seed_import(&dir.path().join("proj"));

    let runner = ScriptedRunner::new(|config| {
        if is_push(config) && config.args.iter().any(|a| a == "--all") {
            exited(128, "fatal: repository not found")
        } else {
            ok()
        }
    });
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    let report = migrator.run_batch(&[record("proj")]).await;

    match &report.records[0].status {
        RecordStatus::Failed(MigrationError::PublishFailed { step, detail }) => {
            assert_eq!(*step, PublishStep::Branches);
            assert!(detail.contains("repository not found"));
        }
        other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(runner.calls_matching("--tags"), 0);
}

#[tokio::test]
async fn test_missing_repository_is_reconciliation_error() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.skip_import = true;

    let runner = ScriptedRunner::new(|_| ok());
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    let report = migrator.run_batch(&[record("absent")]).await;

    assert!(matches!(
        report.records[0].status,
        RecordStatus::Failed(MigrationError::ReconciliationError(_))
    ));
}

#[tokio::test]
async fn test_cancelled_import_cancels_record_only() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let runner = ScriptedRunner::new(|config| {
        let first = config.args.iter().any(|a| a.ends_with("/first"));
        if is_latest_query(config) {
            exited(0, "100")
        } else if is_clone(config) && first {
            // Partial import left behind by the killed engine
            std::fs::create_dir_all(clone_destination(config).join(".git")).unwrap();
            Err(ProcessError::Cancelled {
                output: ProcessOutput::default(),
            })
        } else if is_clone(config) {
            seed_import(clone_destination(config));
            ok()
        } else {
            ok()
        }
    });
    let migrator = MigrationOrchestrator::new(&config, &runner, Interrupts::new());
    let report = migrator
        .run_batch(&[record("first"), record("second")])
        .await;

    assert!(matches!(report.records[0].status, RecordStatus::Cancelled));
    assert!(dir.path().join("first/.git").is_dir());
    assert!(report.records[1].status.is_migrated());
    assert!(!report.aborted);
    assert_eq!(report.exit_code(), EXIT_FAILURES);
}

#[tokio::test]
async fn test_aborted_batch_starts_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let runner = ScriptedRunner::new(|_| ok());
    let interrupts = Interrupts::new();
    interrupts.interrupt();
    interrupts.interrupt();

    let migrator = MigrationOrchestrator::new(&config, &runner, interrupts);
    let report = migrator.run_batch(&[record("a"), record("b")]).await;

    assert!(report.records.is_empty());
    assert_eq!(report.not_started, 2);
    assert_eq!(report.exit_code(), EXIT_ABORTED);
    assert!(runner.calls().is_empty());
}
