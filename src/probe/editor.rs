use super::{Finding, Probe, ScanContext};
use crate::model::{dedup_by_key, EditorIntegration, Extension, ProbeKind};
use crate::platform::editor_settings_path;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

pub struct EditorProbe;

/// The editor command-line launcher.
pub const EDITOR_CLI: &str = "code";

/// Reads the user settings as an opaque JSON object.
///
/// A missing file is `None`; a file that exists but is not a JSON object is
/// an error.
async fn read_settings(ctx: &ScanContext) -> Result<Option<Map<String, Value>>> {
    let path = match editor_settings_path(&ctx.env) {
        Some(path) if path.is_file() => path,
        _ => return Ok(None),
    };

    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read editor settings: {:?}", path))?;
    let settings: Map<String, Value> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse editor settings: {:?}", path))?;

    Ok(Some(settings))
}

#[async_trait]
impl Probe for EditorProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Editor
    }

    async fn probe(&self, ctx: &ScanContext) -> Result<Finding> {
        if !ctx.exec.exists(EDITOR_CLI) {
            return Ok(Finding::Editor(None));
        }

        let output = ctx
            .exec
            .run(&format!("{} --list-extensions --show-versions", EDITOR_CLI))
            .await;
        let extensions = dedup_by_key(
            output
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(Extension::parse)
                .collect(),
        );

        let settings = read_settings(ctx).await?;

        if extensions.is_empty() && settings.is_none() {
            return Ok(Finding::Editor(None));
        }

        Ok(Finding::Editor(Some(EditorIntegration {
            extensions,
            settings,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::HostEnv;
    use crate::exec::fake::FakeExecutor;
    use crate::model::Platform;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    const LIST_COMMAND: &str = "code --list-extensions --show-versions";

    fn write_settings(home: &Path, content: &str) {
        let dir = home.join(".config").join("Code").join("User");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("settings.json"), content).unwrap();
    }

    #[tokio::test]
    async fn test_absent_without_cli() {
        let ctx = ScanContext::new(Arc::new(FakeExecutor::new()), HostEnv::empty(Platform::Linux));
        assert_eq!(EditorProbe.probe(&ctx).await.unwrap(), Finding::Editor(None));
    }

    #[tokio::test]
    async fn test_absent_when_nothing_installed() {
        let home = tempfile::tempdir().unwrap();
        let exec = FakeExecutor::new().with_binary("code", "/usr/bin/code");
        let ctx = ScanContext::new(
            Arc::new(exec),
            HostEnv::empty(Platform::Linux).with_home(home.path()),
        );
        assert_eq!(EditorProbe.probe(&ctx).await.unwrap(), Finding::Editor(None));
    }

    #[tokio::test]
    async fn test_extensions_and_settings() {
        let home = tempfile::tempdir().unwrap();
        write_settings(home.path(), r#"{"editor.fontSize": 14, "files.autoSave": "afterDelay"}"#);

        let exec = FakeExecutor::new()
            .with_binary("code", "/usr/bin/code")
            .with_output(
                LIST_COMMAND,
                "dbaeumer.vscode-eslint@2.4.2\nrust-lang.rust-analyzer@0.3.1789\n\n",
            );
        let ctx = ScanContext::new(
            Arc::new(exec),
            HostEnv::empty(Platform::Linux).with_home(home.path()),
        );

        let Finding::Editor(Some(editor)) = EditorProbe.probe(&ctx).await.unwrap() else {
            panic!("expected editor integration");
        };
        let ids: Vec<&str> = editor.extensions.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["dbaeumer.vscode-eslint", "rust-lang.rust-analyzer"]);

        let settings = editor.settings.unwrap();
        assert_eq!(settings["editor.fontSize"], 14);
    }

    #[tokio::test]
    async fn test_malformed_settings_is_probe_failure() {
        let home = tempfile::tempdir().unwrap();
        write_settings(home.path(), "{ \"editor.fontSize\": ");

        let exec = FakeExecutor::new()
            .with_binary("code", "/usr/bin/code")
            .with_output(LIST_COMMAND, "a.b@1.0.0");
        let ctx = ScanContext::new(
            Arc::new(exec),
            HostEnv::empty(Platform::Linux).with_home(home.path()),
        );

        assert!(EditorProbe.probe(&ctx).await.is_err());
    }
}
