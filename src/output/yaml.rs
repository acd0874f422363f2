//! A small YAML-like renderer.
//!
//! Walks the snapshot's JSON form and writes `key: value` lines with nested
//! mappings indented by two spaces. Nulls are skipped and scalars are
//! written unquoted, so the result is for reading, not for YAML parsers.

use crate::error::Result;
use crate::model::Snapshot;
use serde_json::{Map, Value};
use std::fmt::Write;

pub fn format_yaml(snapshot: &Snapshot) -> Result<String> {
    let value = serde_json::to_value(snapshot)?;
    let mut out = String::new();
    if let Value::Object(map) = &value {
        write_mapping(&mut out, map, 0);
    }
    Ok(out)
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_mapping(out: &mut String, map: &Map<String, Value>, indent: usize) {
    let spaces = "  ".repeat(indent);

    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let _ = writeln!(out, "{}{}:", spaces, key);
                write_sequence(out, items, indent);
            }
            Value::Object(inner) => {
                let _ = writeln!(out, "{}{}:", spaces, key);
                write_mapping(out, inner, indent + 1);
            }
            other => {
                let _ = writeln!(out, "{}{}: {}", spaces, key, scalar(other));
            }
        }
    }
}

fn write_sequence(out: &mut String, items: &[Value], indent: usize) {
    let spaces = "  ".repeat(indent);

    for item in items {
        match item {
            Value::Object(inner) => {
                let _ = writeln!(out, "{}  -", spaces);
                write_mapping(out, inner, indent + 2);
            }
            Value::Array(nested) => {
                let _ = writeln!(out, "{}  -", spaces);
                write_sequence(out, nested, indent + 2);
            }
            other => {
                let _ = writeln!(out, "{}  - {}", spaces, scalar(other));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Binary, GitConfig, PackageManager, SystemInfo};

    #[test]
    fn test_renders_nested_entities() {
        let mut snapshot = Snapshot::new(SystemInfo {
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
            hostname: "devbox".to_string(),
            username: "dev".to_string(),
            shell: "zsh".to_string(),
            home_dir: "/home/dev".to_string(),
        });
        snapshot.package_managers = vec![PackageManager::new("npm", "10.2.0")
            .with_global_packages(vec!["typescript@5.3.3".to_string()])];
        snapshot.runtimes = vec![Binary::new("node", "20.11.0", "/usr/bin/node")];
        snapshot.git = Some(GitConfig {
            user_name: Some("Dev".to_string()),
            ..Default::default()
        });

        let yaml = format_yaml(&snapshot).unwrap();

        assert!(yaml.contains("system:\n  os: linux\n  arch: x86_64\n"));
        assert!(yaml.contains(
            "packageManagers:\n  -\n    name: npm\n    version: 10.2.0\n    globalPackages:\n      - typescript@5.3.3\n"
        ));
        assert!(yaml.contains("runtimes:\n  -\n    name: node\n"));
        assert!(yaml.contains("tools:\n"));
        assert!(yaml.contains("git:\n  userName: Dev\n"));
        assert!(!yaml.contains("userEmail"));
        assert!(!yaml.contains("null"));
    }
}
