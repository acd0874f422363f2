//! Probes that inspect one domain of the host each.
//!
//! This module provides the [`Probe`] trait and one implementation per
//! snapshot domain. A probe reports what it finds as a [`Finding`]; absent
//! software is an empty finding, never an error.
//!
//! # Available Probes
//!
//! | Probe | Kind | Source of truth |
//! |-------|------|-----------------|
//! | [`SystemProbe`] | `system` | Process environment, `echo $0` fallback |
//! | [`PackageManagerProbe`] | `package-managers` | Fixed manager catalog |
//! | [`RuntimeProbe`] | `runtimes` | Fixed runtime catalog |
//! | [`ToolProbe`] | `tools` | Fixed tool catalog |
//! | [`GitProbe`] | `git` | `git config --global` |
//! | [`ShellProbe`] | `shell` | `SHELL`, rc files, `alias`, `PATH` |
//! | [`EditorProbe`] | `editor` | `code --list-extensions`, `settings.json` |
//!
//! # Example
//!
//! ```no_run
//! use devenv::probe::{all_probes, ScanContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = ScanContext::from_host(std::time::Duration::from_secs(5));
//!     for probe in all_probes() {
//!         let finding = probe.probe(&ctx).await?;
//!         println!("{}: {:?}", probe.name(), finding);
//!     }
//!     Ok(())
//! }
//! ```

mod catalog;
mod editor;
mod git;
mod package_manager;
mod runtime;
mod shell;
mod system;
mod tool;

pub use catalog::BinarySpec;
pub use editor::EditorProbe;
pub use git::GitProbe;
pub use package_manager::{ListingFormat, PackageManagerProbe};
pub use runtime::{RuntimeProbe, RUNTIMES};
pub use shell::ShellProbe;
pub use system::{basic_system_info, SystemProbe};
pub use tool::{ToolProbe, TOOLS};

use crate::env::HostEnv;
use crate::exec::{BoundedExecutor, Executor, ShellExecutor};
use crate::model::{
    EditorIntegration, GitConfig, PackageManager, ProbeKind, Runtime, ShellConfig, SystemInfo,
    Tool,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on catalog checks spawned at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Everything a probe may consult: the command executor and the environment
/// captured at scan start.
///
/// `exec` is shared by every probe of a scan and never runs more than
/// `concurrency` commands at once.
#[derive(Clone)]
pub struct ScanContext {
    pub exec: Arc<dyn Executor>,
    pub env: HostEnv,
    pub concurrency: usize,
    unbounded: Arc<dyn Executor>,
}

impl ScanContext {
    pub fn new(exec: Arc<dyn Executor>, env: HostEnv) -> Self {
        Self::bounded(exec, env, DEFAULT_CONCURRENCY)
    }

    fn bounded(exec: Arc<dyn Executor>, env: HostEnv, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            exec: Arc::new(BoundedExecutor::new(exec.clone(), concurrency)),
            env,
            concurrency,
            unbounded: exec,
        }
    }

    /// Captures the current process environment and runs commands through
    /// the platform shell with the given per-command timeout.
    pub fn from_host(timeout: Duration) -> Self {
        let env = HostEnv::capture();
        let exec = Arc::new(ShellExecutor::new(&env, timeout));
        Self::new(exec, env)
    }

    pub fn with_concurrency(self, concurrency: usize) -> Self {
        Self::bounded(self.unbounded, self.env, concurrency)
    }
}

/// What one probe contributes to a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    System(SystemInfo),
    PackageManagers(Vec<PackageManager>),
    Runtimes(Vec<Runtime>),
    Tools(Vec<Tool>),
    Git(Option<GitConfig>),
    Shell(Option<ShellConfig>),
    Editor(Option<EditorIntegration>),
}

/// Inspects one domain of the host.
///
/// Implementors degrade to an empty finding when software is missing or its
/// output cannot be parsed. An `Err` is reserved for unexpected failures and
/// is absorbed by the composer, which records the domain as empty.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Returns the domain this probe fills in.
    fn kind(&self) -> ProbeKind;

    /// Returns the human-readable name of this probe.
    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    async fn probe(&self, ctx: &ScanContext) -> Result<Finding>;
}

/// Returns every probe in the fixed scan order.
pub fn all_probes() -> Vec<Box<dyn Probe>> {
    ProbeKind::ALL.iter().map(|kind| get_probe(*kind)).collect()
}

/// Returns the probe for a specific domain.
///
/// # Example
///
/// ```
/// use devenv::{model::ProbeKind, probe::get_probe};
///
/// let probe = get_probe(ProbeKind::Runtimes);
/// assert_eq!(probe.name(), "Programming Runtimes");
/// ```
pub fn get_probe(kind: ProbeKind) -> Box<dyn Probe> {
    match kind {
        ProbeKind::System => Box::new(SystemProbe),
        ProbeKind::PackageManagers => Box::new(PackageManagerProbe),
        ProbeKind::Runtimes => Box::new(RuntimeProbe),
        ProbeKind::Tools => Box::new(ToolProbe),
        ProbeKind::Git => Box::new(GitProbe),
        ProbeKind::Shell => Box::new(ShellProbe),
        ProbeKind::Editor => Box::new(EditorProbe),
    }
}
