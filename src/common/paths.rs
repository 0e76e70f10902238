//! Default locations for suites, outputs and the configuration file

use std::path::PathBuf;

/// Name used for the platform configuration directory
const APP_NAME: &str = "platform-test-runner";

/// Default suites root, relative to the working directory
pub const DEFAULT_SUITES_DIR: &str = "test-suites";

/// Default output root, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "test-suites-output";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/platform-test-runner/`
/// - macOS: `~/Library/Application Support/platform-test-runner/`
/// - Windows: `%APPDATA%\platform-test-runner\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
