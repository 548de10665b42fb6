// Logging setup

use tracing_subscriber::EnvFilter;

/// Default filter for the given verbosity flags
///
/// `RUST_LOG` replaces it entirely when set.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Initialize logging based on CLI flags
///
/// Tool output is logged under the `svn2git::output` target at info level,
/// so `--quiet` hides it and `RUST_LOG=svn2git::output=off` silences only it.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // A subscriber may already be installed, e.g. by a test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
