//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::{config_path, DEFAULT_OUTPUT_DIR, DEFAULT_SUITES_DIR};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Suite and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Remote extraction service settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Suite and output locations
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Directory holding one subdirectory per test suite
    #[serde(default = "default_suites_dir")]
    pub suites_dir: PathBuf,

    /// Directory that receives per-case outputs and the report
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            suites_dir: default_suites_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_suites_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SUITES_DIR)
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Remote extraction service settings
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Base URL of the Apify API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Actor that performs the extraction
    #[serde(default = "default_actor_id")]
    pub actor_id: String,

    /// Ceiling for waiting on a submitted run
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,

    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            actor_id: default_actor_id(),
            wait_secs: default_wait_secs(),
            token_env: default_token_env(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.apify.com".to_string()
}
fn default_actor_id() -> String {
    // contextractor actor
    "nXCKPalCKnRAQSG5S".to_string()
}
fn default_wait_secs() -> u64 {
    300
}
fn default_token_env() -> String {
    "APIFY_TOKEN".to_string()
}

impl RemoteConfig {
    /// Read the API token from the configured environment variable
    ///
    /// Blank values count as absent.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the platform config file is
    /// used when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, e))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.remote.api_base_url.trim().is_empty() {
            return Err(super::Error::Config("remote.api_base_url must not be empty".to_string()));
        }
        if self.remote.actor_id.trim().is_empty() {
            return Err(super::Error::Config("remote.actor_id must not be empty".to_string()));
        }
        if self.remote.token_env.trim().is_empty() {
            return Err(super::Error::Config("remote.token_env must not be empty".to_string()));
        }
        Ok(())
    }
}
