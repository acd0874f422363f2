//! Snapshot comparison.
//!
//! Entries are matched by identity key; versions are compared as plain
//! strings. Results keep the order of the owning collection: baseline order
//! for removals, current order for additions and changes.

use crate::model::{Inventory, Snapshot};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// An added or removed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Entry {
    pub(crate) fn of<T: Inventory>(item: &T) -> Self {
        Self {
            key: item.key().to_string(),
            version: item.version().map(str::to_string),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} ({})", self.key, version),
            None => write!(f, "{}", self.key),
        }
    }
}

/// An entry present on both sides with different version strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionChange {
    pub key: String,
    pub from: String,
    pub to: String,
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.key, self.from, self.to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDiff {
    pub added: Vec<Entry>,
    pub removed: Vec<Entry>,
    pub changed: Vec<VersionChange>,
}

impl CategoryDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Differences between two snapshots, per inventory category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Differences {
    pub package_managers: CategoryDiff,
    pub runtimes: CategoryDiff,
    pub tools: CategoryDiff,
    pub editor_extensions: CategoryDiff,
}

impl Differences {
    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|(_, diff)| diff.is_empty())
    }

    /// Each category with its display label, in report order.
    pub fn categories(&self) -> [(&'static str, &CategoryDiff); 4] {
        [
            ("Package Managers", &self.package_managers),
            ("Runtimes", &self.runtimes),
            ("Tools", &self.tools),
            ("Editor Extensions", &self.editor_extensions),
        ]
    }
}

/// Compares one keyed collection.
///
/// `changed` is only produced when both sides carry a version.
pub fn diff_items<T: Inventory>(baseline: &[T], current: &[T]) -> CategoryDiff {
    let before: HashMap<&str, &T> = baseline.iter().map(|item| (item.key(), item)).collect();
    let after: HashMap<&str, &T> = current.iter().map(|item| (item.key(), item)).collect();

    let mut diff = CategoryDiff::default();

    for item in current {
        match before.get(item.key()) {
            None => diff.added.push(Entry::of(item)),
            Some(old) => {
                if let (Some(from), Some(to)) = (old.version(), item.version()) {
                    if from != to {
                        diff.changed.push(VersionChange {
                            key: item.key().to_string(),
                            from: from.to_string(),
                            to: to.to_string(),
                        });
                    }
                }
            }
        }
    }

    diff.removed = baseline
        .iter()
        .filter(|item| !after.contains_key(item.key()))
        .map(Entry::of)
        .collect();

    diff
}

/// Computes what changed going from `baseline` to `current`.
///
/// An absent editor domain compares as an empty extension list. Extensions
/// are reported as added or removed only.
pub fn diff(baseline: &Snapshot, current: &Snapshot) -> Differences {
    let mut editor_extensions = diff_items(baseline.extensions(), current.extensions());
    editor_extensions.changed.clear();

    Differences {
        package_managers: diff_items(&baseline.package_managers, &current.package_managers),
        runtimes: diff_items(&baseline.runtimes, &current.runtimes),
        tools: diff_items(&baseline.tools, &current.tools),
        editor_extensions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Binary, EditorIntegration, Extension, PackageManager, SystemInfo};

    fn snapshot(managers: &[(&str, &str)]) -> Snapshot {
        let mut snapshot = Snapshot::new(SystemInfo::default());
        snapshot.package_managers = managers
            .iter()
            .map(|(name, version)| PackageManager::new(*name, *version))
            .collect();
        snapshot
    }

    fn keys(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    fn rendered<T: ToString>(items: &[T]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_diff_with_itself_is_empty() {
        let mut s = snapshot(&[("npm", "10.2.0"), ("brew", "4.1.0")]);
        s.runtimes = vec![Binary::new("node", "20.0.0", "/usr/bin/node")];
        s.editor_integration = Some(EditorIntegration {
            extensions: vec![Extension::parse("a.b@1.0.0")],
            settings: None,
        });

        assert!(diff(&s, &s).is_empty());
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = snapshot(&[("npm", "10.2.0"), ("brew", "4.1.0")]);
        let b = snapshot(&[("brew", "4.1.0"), ("npm", "10.2.0")]);
        assert!(diff(&a, &b).is_empty());
    }

    #[test]
    fn test_package_manager_scenario() {
        let baseline = snapshot(&[("npm", "9.0.0"), ("brew", "4.1.0")]);
        let current = snapshot(&[("npm", "9.1.0"), ("yarn", "1.22.0")]);

        let d = diff(&baseline, &current).package_managers;
        assert_eq!(rendered(&d.added), vec!["yarn (1.22.0)"]);
        assert_eq!(rendered(&d.removed), vec!["brew (4.1.0)"]);
        assert_eq!(rendered(&d.changed), vec!["npm: 9.0.0 → 9.1.0"]);
    }

    #[test]
    fn test_added_and_removed_are_symmetric() {
        let a = snapshot(&[("npm", "9.0.0"), ("brew", "4.1.0"), ("cargo", "1.75.0")]);
        let b = snapshot(&[("pip", "23.0"), ("npm", "9.0.0"), ("gem", "3.5.0")]);

        let forward = diff(&a, &b).package_managers;
        let backward = diff(&b, &a).package_managers;
        assert_eq!(keys(&forward.added), keys(&backward.removed));
        assert_eq!(keys(&forward.removed), keys(&backward.added));
    }

    #[test]
    fn test_changed_key_not_added_or_removed() {
        let mut a = Snapshot::new(SystemInfo::default());
        let mut b = a.clone();
        a.tools = vec![Binary::new("docker", "24.0.5", "/usr/bin/docker")];
        b.tools = vec![Binary::new("docker", "25.0.0", "/usr/local/bin/docker")];

        let d = diff(&a, &b).tools;
        assert!(d.added.is_empty());
        assert!(d.removed.is_empty());
        assert_eq!(d.changed.len(), 1);
        assert_eq!(d.changed[0].key, "docker");
    }

    #[test]
    fn test_removed_follows_baseline_order() {
        let a = snapshot(&[("yarn", "1"), ("apt", "2"), ("brew", "3")]);
        let b = snapshot(&[]);
        assert_eq!(keys(&diff(&a, &b).package_managers.removed), vec!["yarn", "apt", "brew"]);
    }

    #[test]
    fn test_extensions_against_absent_editor() {
        let baseline = Snapshot::new(SystemInfo::default());
        let mut current = baseline.clone();
        current.editor_integration = Some(EditorIntegration {
            extensions: vec![Extension::parse("rust-lang.rust-analyzer@0.3.1")],
            settings: None,
        });

        let d = diff(&baseline, &current).editor_extensions;
        assert_eq!(rendered(&d.added), vec!["rust-lang.rust-analyzer (0.3.1)"]);
        assert!(d.removed.is_empty());
    }

    #[test]
    fn test_extension_version_bump_is_not_reported() {
        let mut a = Snapshot::new(SystemInfo::default());
        let mut b = a.clone();
        a.editor_integration = Some(EditorIntegration {
            extensions: vec![Extension::parse("a.b@1.0.0")],
            settings: None,
        });
        b.editor_integration = Some(EditorIntegration {
            extensions: vec![Extension::parse("a.b@2.0.0")],
            settings: None,
        });

        assert!(diff(&a, &b).is_empty());
    }
}
