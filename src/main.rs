//! Contextractor platform test runner
//!
//! Runs URL test suites against the Contextractor actor on Apify and writes
//! per-case results plus a Markdown report.

use clap::Parser;
use test_runner::cli;
use test_runner::commands::Cli;
use test_runner::common::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    if let Err(e) = cli::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
