use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{Extension, PackageManager, Runtime, Tool};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub hostname: String,
    pub username: String,
    pub shell: String,
    pub home_dir: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            hostname: "unknown".to_string(),
            username: "unknown".to_string(),
            shell: "unknown".to_string(),
            home_dir: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<BTreeMap<String, String>>,
}

impl GitConfig {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none()
            && self.user_email.is_none()
            && self.default_branch.is_none()
            && self.aliases.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellConfig {
    pub shell: String,
    #[serde(default)]
    pub config_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exports: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_additions: Option<Vec<String>>,
}

/// Installed editor extensions plus the editor's user settings, kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorIntegration {
    #[serde(default)]
    pub extensions: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

/// The complete record of one scan.
///
/// `timestamp` and `system` are always populated; every other domain
/// degrades to an empty sequence or `None` when its probe finds nothing or
/// fails. Sequences keep catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
    #[serde(default)]
    pub package_managers: Vec<PackageManager>,
    #[serde(default)]
    pub runtimes: Vec<Runtime>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<ShellConfig>,
    #[serde(default, alias = "vscode", skip_serializing_if = "Option::is_none")]
    pub editor_integration: Option<EditorIntegration>,
}

impl Snapshot {
    /// Creates an empty snapshot stamped with the current time.
    pub fn new(system: SystemInfo) -> Self {
        Self::at(Utc::now(), system)
    }

    pub fn at(timestamp: DateTime<Utc>, system: SystemInfo) -> Self {
        Self {
            timestamp,
            system,
            package_managers: Vec::new(),
            runtimes: Vec::new(),
            tools: Vec::new(),
            git: None,
            shell: None,
            editor_integration: None,
        }
    }

    /// Extensions of the editor domain, empty when the domain is absent.
    pub fn extensions(&self) -> &[Extension] {
        self.editor_integration
            .as_ref()
            .map(|e| e.extensions.as_slice())
            .unwrap_or(&[])
    }

    /// Reads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotRead`] if the file cannot be read and
    /// [`Error::SnapshotParse`] if it is not a valid snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| Error::SnapshotParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Binary;

    fn fixed_system() -> SystemInfo {
        SystemInfo {
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
            hostname: "devbox".to_string(),
            username: "dev".to_string(),
            shell: "zsh".to_string(),
            home_dir: "/home/dev".to_string(),
        }
    }

    #[test]
    fn test_empty_snapshot_json_round_trip() {
        let snapshot = Snapshot::new(fixed_system());
        let json = snapshot.to_json().unwrap();

        assert!(json.contains("\"packageManagers\": []"));
        assert!(json.contains("\"homeDir\": \"/home/dev\""));
        assert!(!json.contains("\"git\""));
        assert!(!json.contains("editorIntegration"));

        let parsed = Snapshot::from_json(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_reads_legacy_vscode_key() {
        let json = r#"{
            "timestamp": "2024-03-01T12:00:00.000Z",
            "system": {"os": "darwin", "arch": "arm64", "hostname": "mac",
                       "username": "dev", "shell": "zsh", "homeDir": "/Users/dev"},
            "packageManagers": [{"name": "brew", "version": "4.1.0"}],
            "runtimes": [{"name": "node", "version": "20.0.0", "path": "/opt/homebrew/bin/node"}],
            "tools": [],
            "vscode": {"extensions": [{"id": "a.b", "name": "b", "publisher": "a"}]}
        }"#;

        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.package_managers[0].name, "brew");
        assert_eq!(snapshot.runtimes[0], Binary::new("node", "20.0.0", "/opt/homebrew/bin/node"));
        assert_eq!(snapshot.extensions().len(), 1);
        assert_eq!(snapshot.extensions()[0].id, "a.b");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Snapshot::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::SnapshotRead { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Snapshot::load(&path).unwrap_err();
        assert!(matches!(err, Error::SnapshotParse { .. }));
    }

    #[test]
    fn test_git_config_is_empty() {
        assert!(GitConfig::default().is_empty());
        let git = GitConfig {
            user_name: Some("Dev".to_string()),
            ..Default::default()
        };
        assert!(!git.is_empty());
    }
}
