use super::{Finding, Probe, ScanContext};
use crate::env::HostEnv;
use crate::model::{ProbeKind, SystemInfo};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

pub struct SystemProbe;

/// Host facts that need no external command.
///
/// The composer uses this as the system record when the System probe is
/// excluded or fails, so a snapshot always carries one.
pub fn basic_system_info(env: &HostEnv) -> SystemInfo {
    let hostname = sysinfo::System::host_name()
        .filter(|h| !h.is_empty())
        .or_else(|| env.var("HOSTNAME").map(str::to_string))
        .or_else(|| env.var("COMPUTERNAME").map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        hostname,
        username: env.username().unwrap_or("unknown").to_string(),
        shell: env.shell_name().unwrap_or_else(|| "unknown".to_string()),
        home_dir: env
            .home()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

/// Normalises `echo $0` output such as `-zsh` or `/bin/sh` to a bare name.
fn shell_from_argv0(output: &str) -> Option<String> {
    let arg0 = output.lines().next()?.trim().trim_start_matches('-');
    Path::new(arg0)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
}

#[async_trait]
impl Probe for SystemProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::System
    }

    async fn probe(&self, ctx: &ScanContext) -> Result<Finding> {
        let mut info = basic_system_info(&ctx.env);

        if ctx.env.shell_name().is_none() {
            let output = ctx.exec.run("echo $0").await;
            if let Some(shell) = shell_from_argv0(&output) {
                info.shell = shell;
            }
        }

        Ok(Finding::System(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::fake::FakeExecutor;
    use crate::model::Platform;
    use std::sync::Arc;

    #[test]
    fn test_shell_from_argv0() {
        assert_eq!(shell_from_argv0("-zsh").as_deref(), Some("zsh"));
        assert_eq!(shell_from_argv0("/bin/sh").as_deref(), Some("sh"));
        assert_eq!(shell_from_argv0("bash\n").as_deref(), Some("bash"));
        assert!(shell_from_argv0("").is_none());
    }

    #[tokio::test]
    async fn test_uses_shell_env_without_running_commands() {
        let exec = Arc::new(FakeExecutor::new());
        let env = HostEnv::empty(Platform::Linux)
            .with_var("SHELL", "/usr/bin/fish")
            .with_var("USER", "dev")
            .with_home("/home/dev");
        let ctx = ScanContext::new(exec.clone(), env);

        let Finding::System(info) = SystemProbe.probe(&ctx).await.unwrap() else {
            panic!("expected system finding");
        };
        assert_eq!(info.shell, "fish");
        assert_eq!(info.username, "dev");
        assert_eq!(info.home_dir, "/home/dev");
        assert_eq!(info.os, std::env::consts::OS);
        assert!(!info.hostname.is_empty());
        assert!(exec.calls().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_argv0() {
        let exec = FakeExecutor::new().with_output("echo $0", "/bin/dash");
        let ctx = ScanContext::new(Arc::new(exec), HostEnv::empty(Platform::Linux));

        let Finding::System(info) = SystemProbe.probe(&ctx).await.unwrap() else {
            panic!("expected system finding");
        };
        assert_eq!(info.shell, "dash");
        assert_eq!(info.username, "unknown");
        assert_eq!(info.home_dir, "");
    }

    #[tokio::test]
    async fn test_unknown_shell_when_everything_fails() {
        let ctx = ScanContext::new(Arc::new(FakeExecutor::new()), HostEnv::empty(Platform::Linux));

        let Finding::System(info) = SystemProbe.probe(&ctx).await.unwrap() else {
            panic!("expected system finding");
        };
        assert_eq!(info.shell, "unknown");
    }
}
