// Migration run

use svn2git_config::ConfigManager;
use svn2git_core::{read_manifest, Interrupts, MigrationOrchestrator};
use svn2git_process::ProcessSupervisor;
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::error::CliResult;
use crate::output;

/// Load settings and the manifest, migrate every record, and return the exit code
pub async fn run(cli: &Cli) -> CliResult<i32> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load(&cli.overrides())?;
    debug!(?config, "Configuration loaded");

    let records = read_manifest(&config.manifest_path, &config.default_revisions)?;
    if records.is_empty() {
        warn!(manifest = %config.manifest_path.display(), "Manifest lists no repositories");
    }
    info!(count = records.len(), "Migrating repositories");

    let interrupts = Interrupts::new();
    let listener = interrupts.listen_for_ctrl_c();

    let supervisor = ProcessSupervisor::new();
    let migrator = MigrationOrchestrator::new(&config, &supervisor, interrupts);
    migrator.prepare()?;
    let report = migrator.run_batch(&records).await;
    listener.abort();

    output::print_report(&report);
    Ok(report.exit_code())
}
