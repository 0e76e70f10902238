//! Contextractor platform test runner
//!
//! This library loads URL test suites, runs them through the Contextractor
//! actor on Apify, and reports which URLs extracted successfully.

pub mod apify;
pub mod cli;
pub mod commands;
pub mod common;
pub mod report;
pub mod testing;

// Re-export commonly used types for tests
pub use apify::{DatasetItem, JobRunner, RunInfo, RunStatus};
pub use common::{Error, Result};
pub use testing::{SuiteExecutor, SuiteRunResult, TestResult, TestStatus};
