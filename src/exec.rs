//! External command execution with soft failure.
//!
//! Every call here collapses to plain text: a command that is missing,
//! exits non-zero without output, or exceeds the timeout produces an empty
//! string (or `"unknown"` for versions) instead of an error. Probes branch on
//! emptiness and never see process errors.

use crate::env::HostEnv;
use async_trait::async_trait;
use regex::Regex;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;

/// Version reported when a version command cannot run at all.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Default per-command timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.\d+\.\d+(?:\.\d+)?)").expect("version pattern is valid")
});

/// Runs external programs on behalf of probes.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Runs `command` through the shell and returns its trimmed stdout.
    ///
    /// Returns an empty string on any failure.
    async fn run(&self, command: &str) -> String;

    /// Runs `command` and returns stdout and stderr joined, or `None` if it
    /// could not run, exited non-zero, or printed nothing.
    async fn run_combined(&self, command: &str) -> Option<String>;

    /// Absolute path of `name` on the search path, or an empty string.
    fn resolve_path(&self, name: &str) -> String;

    fn exists(&self, name: &str) -> bool {
        !self.resolve_path(name).is_empty()
    }

    /// Runs `name flag` and extracts a version string from the output.
    async fn version(&self, name: &str, flag: &str) -> String {
        let command = if flag.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, flag)
        };

        match self.run_combined(&command).await {
            Some(output) => extract_version(&output),
            None => UNKNOWN_VERSION.to_string(),
        }
    }
}

/// Picks the first dotted-numeric version out of free-form output.
///
/// Falls back to the first line verbatim when no `x.y.z` pattern exists.
pub fn extract_version(output: &str) -> String {
    if let Some(m) = VERSION_PATTERN.find(output) {
        return m.as_str().to_string();
    }

    output.lines().next().unwrap_or_default().to_string()
}

/// Executes commands through the platform shell with a timeout.
pub struct ShellExecutor {
    search_path: Option<OsString>,
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new(env: &HostEnv, timeout: Duration) -> Self {
        let entries = env.path_entries();
        let search_path = if entries.is_empty() {
            None
        } else {
            std::env::join_paths(entries).ok()
        };

        Self {
            search_path,
            timeout,
        }
    }

    async fn execute(&self, command: &str) -> Option<Output> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };

        if let Some(path) = &self.search_path {
            cmd.env("PATH", path);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => Some(output),
            Ok(Err(e)) => {
                tracing::debug!("Failed to spawn `{}`: {}", command, e);
                None
            }
            Err(_) => {
                tracing::debug!("`{}` timed out after {:?}", command, self.timeout);
                None
            }
        }
    }
}

#[async_trait]
impl Executor for ShellExecutor {
    async fn run(&self, command: &str) -> String {
        match self.execute(command).await {
            Some(output) => String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
            None => String::new(),
        }
    }

    async fn run_combined(&self, command: &str) -> Option<String> {
        let output = self.execute(command).await?;
        if !output.status.success() {
            return None;
        }

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn resolve_path(&self, name: &str) -> String {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match which::which_in(name, self.search_path.as_ref(), cwd) {
            Ok(path) => path.to_string_lossy().to_string(),
            Err(_) => String::new(),
        }
    }
}

/// Caps the number of commands in flight across every probe sharing it.
///
/// Path lookups do not spawn processes and are not counted.
pub struct BoundedExecutor {
    inner: Arc<dyn Executor>,
    permits: Semaphore,
}

impl BoundedExecutor {
    pub fn new(inner: Arc<dyn Executor>, limit: usize) -> Self {
        Self {
            inner,
            permits: Semaphore::new(limit.clamp(1, Semaphore::MAX_PERMITS)),
        }
    }
}

#[async_trait]
impl Executor for BoundedExecutor {
    async fn run(&self, command: &str) -> String {
        // The semaphore is never closed.
        let _permit = self.permits.acquire().await.ok();
        self.inner.run(command).await
    }

    async fn run_combined(&self, command: &str) -> Option<String> {
        let _permit = self.permits.acquire().await.ok();
        self.inner.run_combined(command).await
    }

    fn resolve_path(&self, name: &str) -> String {
        self.inner.resolve_path(name)
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeExecutor;
    use super::*;

    #[test]
    fn test_extract_version_git() {
        assert_eq!(extract_version("git version 2.40.0"), "2.40.0");
    }

    #[test]
    fn test_extract_version_four_part() {
        assert_eq!(extract_version("dotnet 8.0.100.1 sdk"), "8.0.100.1");
    }

    #[test]
    fn test_extract_version_multiline_banner() {
        let java = "openjdk version \"17.0.8\" 2023-07-18\nOpenJDK Runtime Environment";
        assert_eq!(extract_version(java), "17.0.8");
    }

    #[test]
    fn test_extract_version_no_match_returns_first_line() {
        assert_eq!(extract_version("Some Banner\nsecond line"), "Some Banner");
        assert_eq!(extract_version("go1.21 linux"), "go1.21 linux");
    }

    #[tokio::test]
    async fn test_version_unknown_when_command_fails() {
        let exec = FakeExecutor::new();
        assert_eq!(exec.version("nothing", "--version").await, UNKNOWN_VERSION);
    }

    #[tokio::test]
    async fn test_version_uses_flag() {
        let exec = FakeExecutor::new().with_output("tmux -V", "tmux 3.3a");
        assert_eq!(exec.version("tmux", "-V").await, "tmux 3.3a");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_executor_run_echo() {
        let exec = ShellExecutor::new(&HostEnv::capture(), DEFAULT_TIMEOUT);
        assert_eq!(exec.run("echo hello").await, "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_executor_missing_binary_is_soft() {
        let exec = ShellExecutor::new(&HostEnv::capture(), DEFAULT_TIMEOUT);
        assert_eq!(exec.run("definitely-not-a-command-4242").await, "");
        assert_eq!(
            exec.version("definitely-not-a-command-4242", "--version").await,
            UNKNOWN_VERSION
        );
        assert!(!exec.exists("definitely-not-a-command-4242"));
        assert_eq!(exec.resolve_path("definitely-not-a-command-4242"), "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_executor_combines_stderr() {
        let exec = ShellExecutor::new(&HostEnv::capture(), DEFAULT_TIMEOUT);
        let out = exec.run_combined("echo 'banner 1.2.3' 1>&2").await;
        assert_eq!(out.as_deref(), Some("banner 1.2.3"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_executor_times_out() {
        let exec = ShellExecutor::new(&HostEnv::capture(), Duration::from_millis(200));
        let start = std::time::Instant::now();
        assert_eq!(exec.run("sleep 5; echo late").await, "");
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path_uses_captured_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("fancytool");
        std::fs::write(&bin, "#!/bin/sh\necho fancytool 1.0.0\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let env = HostEnv::empty(crate::model::Platform::current())
            .with_var("PATH", dir.path().to_string_lossy());
        let exec = ShellExecutor::new(&env, DEFAULT_TIMEOUT);

        assert_eq!(exec.resolve_path("fancytool"), bin.to_string_lossy());
        assert!(exec.exists("fancytool"));
    }
}
