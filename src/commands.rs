//! CLI command definitions
//!
//! Defines the clap arguments for the test runner.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "test-runner", about = "Contextractor platform test runner")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Test suite slug to run
    #[arg(long, short = 's', value_name = "SLUG", conflicts_with = "all")]
    pub suite: Option<String>,

    /// Run all test suites
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Show test cases without running them
    #[arg(long, short = 'd')]
    pub dry_run: bool,

    /// Directory containing the test suites (overrides config)
    #[arg(long, value_name = "DIR")]
    pub suites_dir: Option<PathBuf>,

    /// Directory receiving results and the report (overrides config)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (default: platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suite() {
        let cli = Cli::try_parse_from(["test-runner", "--suite", "blog-posts"]).unwrap();
        assert_eq!(cli.suite.as_deref(), Some("blog-posts"));
        assert!(!cli.all);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from(["test-runner", "-a", "-d"]).unwrap();
        assert!(cli.all);
        assert!(cli.dry_run);
    }

    #[test]
    fn test_suite_conflicts_with_all() {
        assert!(Cli::try_parse_from(["test-runner", "--suite", "x", "--all"]).is_err());
    }

    #[test]
    fn test_path_overrides() {
        let cli = Cli::try_parse_from([
            "test-runner",
            "--all",
            "--suites-dir",
            "suites",
            "--output-dir",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.suites_dir, Some(PathBuf::from("suites")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
    }
}
