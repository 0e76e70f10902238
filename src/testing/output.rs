//! Output directory layout
//!
//! `<root>/<suite>/<case>/result.json`, `<root>/<suite>/<case>/dataset-item.json`
//! and `<root>/report.md`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::apify::DatasetItem;
use crate::common::Result;

use super::runner::TestResult;

const RESULT_FILE: &str = "result.json";
const DATASET_ITEM_FILE: &str = "dataset-item.json";
const REPORT_FILE: &str = "report.md";

/// Root directory receiving run artifacts
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove any previous run's artifacts and recreate the root
    pub fn reset(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        std::fs::create_dir_all(&self.root)?;
        tracing::debug!(root = %self.root.display(), "Output directory reset");
        Ok(())
    }

    pub fn case_dir(&self, suite_slug: &str, case_slug: &str) -> PathBuf {
        self.root.join(suite_slug).join(case_slug)
    }

    pub fn result_path(&self, suite_slug: &str, case_slug: &str) -> PathBuf {
        self.case_dir(suite_slug, case_slug).join(RESULT_FILE)
    }

    pub fn dataset_item_path(&self, suite_slug: &str, case_slug: &str) -> PathBuf {
        self.case_dir(suite_slug, case_slug).join(DATASET_ITEM_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }

    /// Persist a test result and, when one matched, its dataset item
    pub fn save_case(
        &self,
        suite_slug: &str,
        case_slug: &str,
        result: &TestResult,
        item: Option<&DatasetItem>,
    ) -> Result<()> {
        std::fs::create_dir_all(self.case_dir(suite_slug, case_slug))?;

        write_json(&self.result_path(suite_slug, case_slug), result)?;
        if let Some(item) = item {
            write_json(&self.dataset_item_path(suite_slug, case_slug), item.raw())?;
        }
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
