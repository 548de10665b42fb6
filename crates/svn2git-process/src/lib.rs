//! # svn2git-process
//!
//! **Purpose**: Scoped execution of the external tools svn2git drives
//! (`svn`, `git svn`, `git push`).
//!
//! A supervised command runs in its own process group/session. Its combined
//! stdout/stderr is streamed line by line into an ordered buffer and to the
//! `svn2git::output` tracing target. When the run is cancelled, or the output
//! stream breaks, the whole process tree is torn down before control returns.
//!
//! ## Features
//!
//! - **Detached spawn**: new process group on Unix, new process group plus
//!   detached console on Windows
//! - **Line streaming**: lossy UTF-8 decoding, trailing whitespace trimmed
//! - **Tree kill**: descendants first, bounded grace period, then force-kill
//!   of survivors and (optionally) the parent
//! - **Runner seam**: [`CommandRunner`] lets callers swap the real supervisor
//!   for a scripted one in tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use svn2git_process::{CommandRunner, ProcessConfig, ProcessSupervisor};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let supervisor = ProcessSupervisor::new();
//! let cancel = CancellationToken::new();
//!
//! let config = ProcessConfig::new("git").args(["--version"]);
//! let output = supervisor.run(config, &cancel).await?;
//! println!("exit: {:?}\n{}", output.exit_code, output.combined());
//! # Ok(())
//! # }
//! ```

pub mod child;
pub mod config;
pub mod error;
pub mod output;
pub mod runner;
pub mod supervisor;
pub mod tree;

pub use child::ExternalProcessHandle;
pub use config::{KillScope, ProcessConfig};
pub use error::{ProcessError, Result};
pub use output::ProcessOutput;
pub use runner::CommandRunner;
pub use supervisor::ProcessSupervisor;
