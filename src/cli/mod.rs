//! CLI command handling
//!
//! Resolves configuration, then dispatches to dry-run, single-suite or
//! all-suites mode and prints the final tally.

use std::sync::Arc;

use clap::CommandFactory;
use colored::Colorize;

use crate::apify::ApifyClient;
use crate::commands::Cli;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::report::{self, ReportSummary};
use crate::testing::{OutputDir, SuiteExecutor, SuiteLoader, SuiteRunResult};

/// Which suites a run covers
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    One(String),
    All,
}

/// Dispatch a parsed command line
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let loader = SuiteLoader::new(cli.suites_dir.unwrap_or(config.paths.suites_dir));
    let output = OutputDir::new(cli.output_dir.unwrap_or(config.paths.output_dir));

    if cli.dry_run {
        return dry_run(&loader, cli.suite.as_deref());
    }

    let selection = match (cli.suite, cli.all) {
        (Some(slug), _) => Selection::One(slug),
        (None, true) => Selection::All,
        (None, false) => {
            eprintln!("{}", Cli::command().render_help());
            return Err(Error::Usage(
                "Must specify --suite <slug> or --all".to_string(),
            ));
        }
    };

    let client = ApifyClient::new(&config.remote)?;
    let executor = SuiteExecutor::new(loader, output, Arc::new(client));

    println!("{}", "Contextractor Test Runner".bold());
    println!("{}", "=".repeat(50));

    let results = match selection {
        Selection::All => executor.run_all().await?,
        Selection::One(slug) => vec![executor.run_one(&slug).await?],
    };

    let report_path = report::generate(&results, executor.output())?;
    println!("\nReport saved to: {}", report_path.display());

    print_tally(&results);
    Ok(())
}

/// Print what would run without contacting the remote service
fn dry_run(loader: &SuiteLoader, suite: Option<&str>) -> Result<()> {
    if let Some(slug) = suite {
        let suite = loader.load(slug)?;
        println!("\n{} {}", "Test Suite:".blue().bold(), suite.slug.white().bold());
        println!("Description: {}", suite.summary());
        println!("Settings: {}", serde_json::to_string_pretty(&suite.settings)?);
        println!("\nTest Cases ({}):", suite.test_cases.len());
        for tc in &suite.test_cases {
            println!("  - {}: {}", tc.slug, tc.url);
        }
    } else {
        let slugs = loader.list()?;
        println!("\nAvailable Test Suites ({}):", slugs.len());
        for slug in &slugs {
            let suite = loader.load(slug)?;
            println!("\n  {}:", slug.white().bold());
            println!("    {}", suite.summary().dimmed());
            println!("    Test cases: {}", suite.test_cases.len());
        }
    }

    Ok(())
}

fn print_tally(results: &[SuiteRunResult]) {
    let summary = ReportSummary::from_results(results);

    println!("\n{}", "=".repeat(50));
    let tally = format!(
        "Total: {}/{} test cases passed",
        summary.passed, summary.total
    );
    if summary.failed == 0 {
        println!("{}", tally.green().bold());
    } else {
        println!("{}", tally.red().bold());
        println!("\n{}", "Failed:".red());
        for failed in report::failed_cases(results) {
            println!(
                "  {} {}/{} ({})",
                "✗".red(),
                failed.suite,
                failed.test_case,
                failed.url.dimmed()
            );
            println!("      {}", failed.error);
        }
    }
}
