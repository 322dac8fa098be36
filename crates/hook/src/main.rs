//! `send-event` — forward one Claude Code hook event.
//!
//! Reads the hook payload from stdin and POSTs it to the collector. Exits 0
//! unless the payload itself is unreadable.

use std::process::ExitCode;

use clap::Parser;
use hookcast::logging::init_logging;
use hookcast::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logging = match init_logging(cli.debug) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    hookcast::run(&cli, std::io::stdin().lock()).await
}
