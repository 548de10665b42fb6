// svn2git CLI Entry Point

use clap::Parser;
use svn2git_cli::{logging, output, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    match run::run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::print_error(&e.user_message());
            std::process::exit(1);
        }
    }
}
