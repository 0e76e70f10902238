//! Suite runner
//!
//! Loads test suites from disk, runs each one as a single remote extraction
//! job, and reconciles the returned dataset items with the test cases by URL.

mod config;
mod loader;
mod matcher;
mod output;
mod runner;

pub use config::*;
pub use loader::SuiteLoader;
pub use matcher::match_dataset_item;
pub use output::OutputDir;
pub use runner::{
    SuiteExecutor, SuiteRunResult, TestResult, TestStatus, NO_ITEM_MESSAGE,
    UNKNOWN_ERROR_MESSAGE,
};
