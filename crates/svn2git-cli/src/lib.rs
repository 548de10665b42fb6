//! svn2git command line interface

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod run;

pub use cli::Cli;
pub use error::{CliError, CliResult};
