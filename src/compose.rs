//! Snapshot composition.
//!
//! The [`Composer`] runs a set of probes against one [`ScanContext`] and
//! merges their findings into a [`Snapshot`]. A probe that errors or panics
//! leaves its domain empty; the scan itself never fails.

use crate::config::glob_match;
use crate::error::{Error, Result};
use crate::model::{dedup_by_key, ProbeKind, Snapshot};
use crate::probe::{basic_system_info, get_probe, Finding, Probe, ScanContext};
use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;
use indicatif::ProgressBar;
use std::panic::AssertUnwindSafe;

/// Runs probes and builds snapshots.
pub struct Composer {
    probes: Vec<Box<dyn Probe>>,
    parallel: bool,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    /// A composer over every probe, running domains concurrently.
    pub fn new() -> Self {
        Self::for_kinds(&ProbeKind::ALL)
    }

    pub fn for_kinds(kinds: &[ProbeKind]) -> Self {
        Self::from_probes(kinds.iter().map(|kind| get_probe(*kind)).collect())
    }

    pub fn from_probes(probes: Vec<Box<dyn Probe>>) -> Self {
        Self {
            probes,
            parallel: true,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn kinds(&self) -> Vec<ProbeKind> {
        self.probes.iter().map(|p| p.kind()).collect()
    }

    pub async fn compose(&self, ctx: &ScanContext) -> Snapshot {
        self.compose_with_progress(ctx, None).await
    }

    /// Runs every probe and merges the results, advancing `progress` once
    /// per finished probe.
    pub async fn compose_with_progress(
        &self,
        ctx: &ScanContext,
        progress: Option<&ProgressBar>,
    ) -> Snapshot {
        let timestamp = Utc::now();

        let findings = if self.parallel && self.probes.len() > 1 {
            let futures = self
                .probes
                .iter()
                .map(|probe| run_probe(probe.as_ref(), ctx, progress));
            join_all(futures).await
        } else {
            let mut findings = Vec::with_capacity(self.probes.len());
            for probe in &self.probes {
                if let Some(pb) = progress {
                    pb.set_message(format!("Scanning {}...", probe.name()));
                }
                findings.push(run_probe(probe.as_ref(), ctx, progress).await);
            }
            findings
        };

        let mut snapshot = Snapshot::at(timestamp, basic_system_info(&ctx.env));
        for finding in findings.into_iter().flatten() {
            merge(&mut snapshot, finding);
        }

        snapshot
    }
}

async fn run_probe(
    probe: &dyn Probe,
    ctx: &ScanContext,
    progress: Option<&ProgressBar>,
) -> Option<Finding> {
    let kind = probe.kind();
    tracing::debug!(probe = kind.as_str(), "running probe");

    let result = AssertUnwindSafe(probe.probe(ctx)).catch_unwind().await;

    if let Some(pb) = progress {
        pb.inc(1);
    }

    match result {
        Ok(Ok(finding)) => Some(finding),
        Ok(Err(e)) => {
            tracing::debug!(probe = kind.as_str(), error = ?e, "probe failed, domain left empty");
            None
        }
        Err(_) => {
            tracing::debug!(probe = kind.as_str(), "probe panicked, domain left empty");
            None
        }
    }
}

fn merge(snapshot: &mut Snapshot, finding: Finding) {
    match finding {
        Finding::System(system) => snapshot.system = system,
        Finding::PackageManagers(managers) => snapshot.package_managers = dedup_by_key(managers),
        Finding::Runtimes(runtimes) => snapshot.runtimes = dedup_by_key(runtimes),
        Finding::Tools(tools) => snapshot.tools = dedup_by_key(tools),
        Finding::Git(git) => snapshot.git = git,
        Finding::Shell(shell) => snapshot.shell = shell,
        Finding::Editor(editor) => {
            snapshot.editor_integration = editor.map(|mut editor| {
                editor.extensions = dedup_by_key(editor.extensions);
                editor
            })
        }
    }
}

fn matching_kinds(pattern: &str) -> Result<Vec<ProbeKind>> {
    if pattern.contains('*') {
        let matched: Vec<ProbeKind> = ProbeKind::ALL
            .into_iter()
            .filter(|kind| glob_match(pattern, kind.as_str()))
            .collect();
        if matched.is_empty() {
            return Err(Error::UnknownProbe(format!("No probe matches: {}", pattern)));
        }
        Ok(matched)
    } else {
        pattern
            .parse::<ProbeKind>()
            .map(|kind| vec![kind])
            .map_err(Error::UnknownProbe)
    }
}

/// Resolves include/exclude lists into the probes to run, in scan order.
///
/// An empty `include` selects every probe. The system probe is always kept
/// so that a snapshot carries a complete system record.
///
/// # Errors
///
/// Returns [`Error::UnknownProbe`] if a name or pattern matches no probe.
pub fn select_probes(include: &[String], exclude: &[String]) -> Result<Vec<ProbeKind>> {
    let mut included = Vec::new();
    for pattern in include {
        included.extend(matching_kinds(pattern)?);
    }

    let mut excluded = Vec::new();
    for pattern in exclude {
        excluded.extend(matching_kinds(pattern)?);
    }

    Ok(ProbeKind::ALL
        .into_iter()
        .filter(|kind| {
            *kind == ProbeKind::System
                || ((include.is_empty() || included.contains(kind)) && !excluded.contains(kind))
        })
        .collect())
}
