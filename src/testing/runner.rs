//! Suite executor
//!
//! Submits a suite's URLs as one remote run, matches the returned dataset
//! items back to the test cases and persists every outcome.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::apify::{DatasetItem, JobRunner, RunStatus};
use crate::common::Result;

use super::config::TestSuite;
use super::loader::SuiteLoader;
use super::matcher::match_dataset_item;
use super::output::OutputDir;

/// Message recorded when the dataset has no item for a test case URL
pub const NO_ITEM_MESSAGE: &str = "No dataset item found for URL";

/// Message recorded when a flagged item carries no message of its own
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Final status of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Success,
    Error,
}

impl TestStatus {
    pub fn icon(self) -> &'static str {
        match self {
            TestStatus::Success => "✅",
            TestStatus::Error => "❌",
        }
    }
}

/// Result of running a single test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub url: String,
    pub status: TestStatus,
    pub error_message: Option<String>,
    pub dataset_item_path: Option<PathBuf>,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.status == TestStatus::Success
    }

    /// Classify a test case from its matched dataset item
    ///
    /// `item_path` is where the matched item is persisted; it is only
    /// recorded when an item matched.
    pub fn classify(url: &str, item: Option<&DatasetItem>, item_path: PathBuf) -> Self {
        match item {
            None => Self {
                url: url.to_string(),
                status: TestStatus::Error,
                error_message: Some(NO_ITEM_MESSAGE.to_string()),
                dataset_item_path: None,
            },
            Some(item) if item.is_error() => Self {
                url: url.to_string(),
                status: TestStatus::Error,
                error_message: Some(
                    item.error_message()
                        .filter(|m| !m.is_empty())
                        .unwrap_or(UNKNOWN_ERROR_MESSAGE)
                        .to_string(),
                ),
                dataset_item_path: Some(item_path),
            },
            Some(_) => Self {
                url: url.to_string(),
                status: TestStatus::Success,
                error_message: None,
                dataset_item_path: Some(item_path),
            },
        }
    }
}

/// Outcome of one suite run
#[derive(Debug, Clone)]
pub struct SuiteRunResult {
    pub suite_slug: String,
    /// Test case slug and result, in suite order
    pub results: Vec<(String, TestResult)>,
    pub run_id: String,
    pub dataset_id: String,
}

impl SuiteRunResult {
    pub fn get(&self, case_slug: &str) -> Option<&TestResult> {
        self.results
            .iter()
            .find(|(slug, _)| slug == case_slug)
            .map(|(_, result)| result)
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }
}

/// Runs test suites against a job runner and persists their outputs
pub struct SuiteExecutor {
    loader: SuiteLoader,
    output: OutputDir,
    runner: Arc<dyn JobRunner>,
}

impl SuiteExecutor {
    pub fn new(loader: SuiteLoader, output: OutputDir, runner: Arc<dyn JobRunner>) -> Self {
        Self {
            loader,
            output,
            runner,
        }
    }

    pub fn output(&self) -> &OutputDir {
        &self.output
    }

    /// Run every suite in listing order
    pub async fn run_all(&self) -> Result<Vec<SuiteRunResult>> {
        self.output.reset()?;

        let slugs = self.loader.list()?;
        println!("Found {} test suite(s)", slugs.len());

        let mut results = Vec::with_capacity(slugs.len());
        for slug in &slugs {
            let suite = self.loader.load(slug)?;
            results.push(self.run(&suite).await?);
        }

        Ok(results)
    }

    /// Run a single suite by slug
    pub async fn run_one(&self, slug: &str) -> Result<SuiteRunResult> {
        self.output.reset()?;

        let suite = self.loader.load(slug)?;
        self.run(&suite).await
    }

    /// Run a loaded suite and save its results
    ///
    /// Every test case's `result.json` (and `dataset-item.json` when an item
    /// matched) is written before this returns.
    pub async fn run(&self, suite: &TestSuite) -> Result<SuiteRunResult> {
        println!(
            "\n{} {}",
            "Running test suite:".blue().bold(),
            suite.slug.white().bold()
        );
        println!("  Test cases: {}", suite.test_cases.len());

        let urls = suite.urls();
        let run = self.runner.submit(&urls, &suite.settings).await?;

        println!(
            "  Actor run completed: {} (status: {})",
            run.run_id, run.status
        );
        if run.status != RunStatus::Succeeded {
            tracing::warn!(
                suite = %suite.slug,
                run_id = %run.run_id,
                status = %run.status,
                "Actor run did not succeed, collecting partial results"
            );
        }

        let items = self.runner.fetch_results(&run.dataset_id).await?;
        println!("  Retrieved {} dataset items", items.len());

        let mut results = Vec::with_capacity(suite.test_cases.len());
        for test_case in &suite.test_cases {
            let item = match_dataset_item(&items, &test_case.url);
            let item_path = self.output.dataset_item_path(&suite.slug, &test_case.slug);
            let result = TestResult::classify(&test_case.url, item, item_path);

            if let Some(item) = item {
                let formats: Vec<&str> = item.content_refs().iter().map(|(f, _)| *f).collect();
                tracing::debug!(
                    case = %test_case.slug,
                    http_status = ?item.http_status(),
                    title = ?item.metadata().and_then(|m| m.title),
                    ?formats,
                    "Matched dataset item"
                );
            }

            self.output
                .save_case(&suite.slug, &test_case.slug, &result, item)?;

            if result.is_success() {
                println!("  {} {}", result.status.icon(), test_case.slug);
            } else {
                println!(
                    "  {} {} {}",
                    result.status.icon(),
                    test_case.slug,
                    result.error_message.as_deref().unwrap_or_default().dimmed()
                );
            }

            results.push((test_case.slug.clone(), result));
        }

        Ok(SuiteRunResult {
            suite_slug: suite.slug.clone(),
            results,
            run_id: run.run_id,
            dataset_id: run.dataset_id,
        })
    }
}
