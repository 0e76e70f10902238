//! Suite loading from the suites directory
//!
//! Each suite lives in `<root>/<slug>/` with `description.md`,
//! `settings.json` and `urls.json`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::common::{Error, Result};

use super::config::{ActorSettings, TestCase, TestCaseInput, TestSuite};

const DESCRIPTION_FILE: &str = "description.md";
const SETTINGS_FILE: &str = "settings.json";
const URLS_FILE: &str = "urls.json";

/// Reads test suites from a directory tree
#[derive(Debug, Clone)]
pub struct SuiteLoader {
    root: PathBuf,
}

impl SuiteLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load a test suite by slug
    pub fn load(&self, slug: &str) -> Result<TestSuite> {
        let suite_dir = self.root.join(slug);
        if !suite_dir.is_dir() {
            return Err(Error::SuiteNotFound {
                slug: slug.to_string(),
                path: suite_dir.display().to_string(),
            });
        }

        let description = read_file(&suite_dir.join(DESCRIPTION_FILE))?;
        let settings: ActorSettings = read_json(&suite_dir.join(SETTINGS_FILE))?;
        let inputs: Vec<TestCaseInput> = read_json(&suite_dir.join(URLS_FILE))?;

        let mut seen = HashSet::new();
        for input in &inputs {
            if !is_safe_case_slug(&input.slug) {
                return Err(Error::invalid_suite(
                    slug,
                    &format!("test case slug '{}' in {} is not a plain name", input.slug, URLS_FILE),
                ));
            }
            if !seen.insert(input.slug.as_str()) {
                return Err(Error::invalid_suite(
                    slug,
                    &format!("duplicate test case slug '{}' in {}", input.slug, URLS_FILE),
                ));
            }
        }

        let test_cases = inputs
            .into_iter()
            .map(|input| TestCase {
                slug: input.slug,
                url: input.url,
                suite_slug: slug.to_string(),
            })
            .collect::<Vec<_>>();

        tracing::debug!(suite = slug, cases = test_cases.len(), "Loaded test suite");

        Ok(TestSuite {
            slug: slug.to_string(),
            description: description.trim().to_string(),
            settings,
            test_cases,
        })
    }

    /// List all available test suite slugs, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| Error::file_read(&self.root, e))?;

        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                slugs.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        slugs.sort();

        Ok(slugs)
    }
}

/// Case slugs name an output directory, so they must be one plain path segment
fn is_safe_case_slug(slug: &str) -> bool {
    !slug.trim().is_empty()
        && slug != "."
        && !slug.contains("..")
        && !slug.contains(['/', '\\'])
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| Error::parse(path, e))
}
