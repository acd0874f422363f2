use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The domain of the host a probe inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeKind {
    System,
    PackageManagers,
    Runtimes,
    Tools,
    Git,
    Shell,
    Editor,
}

impl ProbeKind {
    /// Every kind, in the fixed order probes run and results are merged.
    pub const ALL: [ProbeKind; 7] = [
        ProbeKind::System,
        ProbeKind::PackageManagers,
        ProbeKind::Runtimes,
        ProbeKind::Tools,
        ProbeKind::Git,
        ProbeKind::Shell,
        ProbeKind::Editor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::System => "system",
            ProbeKind::PackageManagers => "package-managers",
            ProbeKind::Runtimes => "runtimes",
            ProbeKind::Tools => "tools",
            ProbeKind::Git => "git",
            ProbeKind::Shell => "shell",
            ProbeKind::Editor => "editor",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProbeKind::System => "System Information",
            ProbeKind::PackageManagers => "Package Managers",
            ProbeKind::Runtimes => "Programming Runtimes",
            ProbeKind::Tools => "Development Tools",
            ProbeKind::Git => "Git Configuration",
            ProbeKind::Shell => "Shell Configuration",
            ProbeKind::Editor => "Editor Integration",
        }
    }
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for ProbeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(ProbeKind::System),
            "package-managers" | "packages" | "pm" => Ok(ProbeKind::PackageManagers),
            "runtimes" => Ok(ProbeKind::Runtimes),
            "tools" => Ok(ProbeKind::Tools),
            "git" => Ok(ProbeKind::Git),
            "shell" => Ok(ProbeKind::Shell),
            "editor" | "vscode" => Ok(ProbeKind::Editor),
            _ => Err(format!(
                "Unknown probe: {}. Use: system, package-managers, runtimes, tools, git, shell, editor",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        #[cfg(target_os = "linux")]
        return Platform::Linux;
        #[cfg(target_os = "macos")]
        return Platform::MacOS;
        #[cfg(target_os = "windows")]
        return Platform::Windows;
    }
}

/// An entry that can be matched across snapshots by its identity key.
pub trait Inventory {
    /// The identity key (name or id) unique within its collection.
    fn key(&self) -> &str;

    /// The free-form version string, if this kind of entry carries one.
    fn version(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManager {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_packages: Option<Vec<String>>,
}

impl PackageManager {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            global_packages: None,
        }
    }

    /// Attaches the global package listing; an empty listing is dropped.
    pub fn with_global_packages(mut self, packages: Vec<String>) -> Self {
        self.global_packages = if packages.is_empty() {
            None
        } else {
            Some(packages)
        };
        self
    }
}

impl Inventory for PackageManager {
    fn key(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        Some(&self.version)
    }
}

/// An executable found on the search path: a language runtime or a CLI tool.
///
/// `path` is empty when the executable could not be resolved, which is a
/// normal state rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binary {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub path: String,
}

pub type Runtime = Binary;
pub type Tool = Binary;

impl Binary {
    pub fn new(name: impl Into<String>, version: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            path: path.into(),
        }
    }
}

impl Inventory for Binary {
    fn key(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        Some(&self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub id: String,
    pub name: String,
    pub publisher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Extension {
    /// Parses one line of `--list-extensions --show-versions` output.
    ///
    /// Accepts `publisher.name@version`, then `publisher.name`, and finally
    /// keeps the whole line as an opaque id with an `unknown` publisher.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        let (ident, version) = match line.split_once('@') {
            Some((ident, version)) if !version.is_empty() => (ident, Some(version.to_string())),
            _ => (line, None),
        };

        match ident.split_once('.') {
            Some((publisher, name)) if !publisher.is_empty() && !name.is_empty() => Self {
                id: format!("{}.{}", publisher, name),
                name: name.to_string(),
                publisher: publisher.to_string(),
                version,
            },
            _ => Self {
                id: line.to_string(),
                name: line.to_string(),
                publisher: "unknown".to_string(),
                version: None,
            },
        }
    }
}

impl Inventory for Extension {
    fn key(&self) -> &str {
        &self.id
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Removes entries with a repeated identity key.
///
/// The surviving entry keeps the position of the first occurrence and the
/// value of the last one.
pub fn dedup_by_key<T: Inventory>(items: Vec<T>) -> Vec<T> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        match slots.get(item.key()) {
            Some(&idx) => out[idx] = item,
            None => {
                slots.insert(item.key().to_string(), out.len());
                out.push(item);
            }
        }
    }

    out
}
