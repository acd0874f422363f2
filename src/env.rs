//! The process environment, captured once per scan.
//!
//! Probes read environment variables, the search path, and the home
//! directory only through [`HostEnv`], so every probe in a scan observes the
//! same values and tests can fabricate an environment without touching the
//! real process state.

use crate::model::Platform;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct HostEnv {
    vars: HashMap<String, String>,
    home: Option<PathBuf>,
    platform: Platform,
}

impl HostEnv {
    /// Snapshots the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
            home: dirs::home_dir(),
            platform: Platform::current(),
        }
    }

    /// An environment with no variables and no home directory.
    pub fn empty(platform: Platform) -> Self {
        Self {
            vars: HashMap::new(),
            home: None,
            platform,
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Looks up a variable, treating an empty value as unset.
    ///
    /// Names are case-insensitive on Windows.
    pub fn var(&self, key: &str) -> Option<&str> {
        let value = match self.vars.get(key) {
            Some(v) => Some(v),
            None if self.platform == Platform::Windows => self
                .vars
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v),
            None => None,
        };
        value.map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn path_entries(&self) -> Vec<PathBuf> {
        self.var("PATH")
            .map(|p| std::env::split_paths(p).filter(|e| !e.as_os_str().is_empty()).collect())
            .unwrap_or_default()
    }

    /// Shell name taken from the last component of `SHELL`.
    pub fn shell_name(&self) -> Option<String> {
        let shell = self.var("SHELL")?;
        Path::new(shell)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
    }

    pub fn username(&self) -> Option<&str> {
        self.var("USER").or_else(|| self.var("USERNAME"))
    }
}
