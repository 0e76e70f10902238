//! Error types for the test runner
//!
//! Per-test-case failures are never errors: they are recorded as data in a
//! `TestResult`. Everything here aborts the run.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the test runner
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("{0} environment variable is not set")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Suite Errors ===
    #[error("Test suite '{slug}' not found at {path}")]
    SuiteNotFound { slug: String, path: String },

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to parse '{path}': {error}")]
    Parse { path: String, error: String },

    #[error("Invalid test suite '{slug}': {reason}")]
    InvalidSuite { slug: String, reason: String },

    // === Remote Errors ===
    #[error("Actor run {run_id} did not produce a dataset")]
    NoDataset { run_id: String },

    #[error("Remote request failed with status {status}: {message}")]
    RemoteRequest { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === Command Errors ===
    #[error("{0}")]
    Usage(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file read error for a path
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a parse error for a path
    pub fn parse(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create an invalid suite error
    pub fn invalid_suite(slug: &str, reason: &str) -> Self {
        Self::InvalidSuite {
            slug: slug.to_string(),
            reason: reason.to_string(),
        }
    }
}
