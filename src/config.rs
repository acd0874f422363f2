//! Configuration file handling.
//!
//! This module provides loading and saving of devenv configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/devenv/config.toml`
//! - macOS: `~/Library/Application Support/devenv/config.toml`
//! - Windows: `%APPDATA%\devenv\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! default_format = "summary"
//! command_timeout_secs = 5
//! max_concurrent_commands = 8
//! parallel = true
//! exclude = ["editor"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::platform::config_dir;

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use devenv::Config;
///
/// let config = Config::load().unwrap_or_default();
/// println!("Timeout: {:?}", config.command_timeout());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format for `scan` when no `--format` flag is provided.
    ///
    /// Valid values: "summary", "json", "yaml", "script"
    /// Default: "summary"
    pub default_format: String,

    /// How long a single external command may run, in seconds.
    ///
    /// Default: 5
    pub command_timeout_secs: u64,

    /// Upper bound on external commands running at once, across all probes.
    ///
    /// Default: 8
    pub max_concurrent_commands: usize,

    /// Whether probe domains run concurrently.
    ///
    /// Default: true
    pub parallel: bool,

    /// Probes skipped unless named by `--include`.
    ///
    /// Accepts probe names or `*` globs (e.g. "editor", "pack*").
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: "summary".to_string(),
            command_timeout_secs: crate::exec::DEFAULT_TIMEOUT.as_secs(),
            max_concurrent_commands: crate::probe::DEFAULT_CONCURRENCY,
            parallel: true,
            exclude: Vec::new(),
        }
    }
}

/// Simple glob matching (supports * as wildcard).
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs.max(1))
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match_exact() {
        assert!(glob_match("git", "git"));
        assert!(!glob_match("git", "tools"));
    }

    #[test]
    fn test_glob_match_prefix() {
        assert!(glob_match("pack*", "package-managers"));
        assert!(!glob_match("pack*", "runtimes"));
    }

    #[test]
    fn test_glob_match_suffix_and_contains() {
        assert!(glob_match("*s", "tools"));
        assert!(glob_match("*age*", "package-managers"));
        assert!(!glob_match("*age*", "shell"));
        assert!(glob_match("*", "editor"));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.default_format, "summary");
        assert_eq!(config.command_timeout_secs, 5);
        assert_eq!(config.command_timeout(), crate::exec::DEFAULT_TIMEOUT);
        assert_eq!(config.max_concurrent_commands, 8);
        assert!(config.parallel);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.command_timeout_secs, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "command_timeout_secs = 2\nexclude = [\"editor\"]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.command_timeout(), Duration::from_secs(2));
        assert_eq!(config.exclude, vec!["editor"]);
        assert_eq!(config.default_format, "summary");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "parallel = \"sometimes\"").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.parallel = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.parallel);
    }
}
