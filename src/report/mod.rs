//! Aggregate reporting over suite runs

mod markdown;

use std::path::PathBuf;

use crate::common::Result;
use crate::testing::{OutputDir, SuiteRunResult, TestStatus};

pub use markdown::render;

/// One table row of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub suite_name: String,
    pub test_case_slug: String,
    pub url: String,
    pub status: TestStatus,
    pub error_message: Option<String>,
}

/// Totals across all reported test cases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl ReportSummary {
    pub fn from_entries(entries: &[ReportEntry]) -> Self {
        let passed = entries
            .iter()
            .filter(|e| e.status == TestStatus::Success)
            .count();
        Self {
            total: entries.len(),
            passed,
            failed: entries.len() - passed,
        }
    }

    pub fn from_results(suite_results: &[SuiteRunResult]) -> Self {
        Self::from_entries(&collect_entries(suite_results))
    }
}

/// A failed test case, flattened for console output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCase {
    pub suite: String,
    pub test_case: String,
    pub url: String,
    pub error: String,
}

/// Flatten suite results into report rows, in suite then test-case order
pub fn collect_entries(suite_results: &[SuiteRunResult]) -> Vec<ReportEntry> {
    suite_results
        .iter()
        .flat_map(|suite| {
            suite.results.iter().map(|(case_slug, result)| ReportEntry {
                suite_name: suite.suite_slug.clone(),
                test_case_slug: case_slug.clone(),
                url: result.url.clone(),
                status: result.status,
                error_message: result.error_message.clone(),
            })
        })
        .collect()
}

/// List every failed test case across suites
pub fn failed_cases(suite_results: &[SuiteRunResult]) -> Vec<FailedCase> {
    collect_entries(suite_results)
        .into_iter()
        .filter(|e| e.status == TestStatus::Error)
        .map(|e| FailedCase {
            suite: e.suite_name,
            test_case: e.test_case_slug,
            url: e.url,
            error: e
                .error_message
                .unwrap_or_else(|| "Unknown error".to_string()),
        })
        .collect()
}

/// Write `report.md` into the output root, replacing any previous report
pub fn generate(suite_results: &[SuiteRunResult], output: &OutputDir) -> Result<PathBuf> {
    let content = render(suite_results, chrono::Utc::now());
    let report_path = output.report_path();

    std::fs::create_dir_all(output.root())?;
    std::fs::write(&report_path, content)?;
    tracing::debug!(path = %report_path.display(), "Report written");

    Ok(report_path)
}
