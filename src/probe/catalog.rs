//! Shared lookup over a fixed table of executables.

use super::ScanContext;
use crate::model::{dedup_by_key, Binary};
use futures::stream::{self, StreamExt};

/// One catalog row: the executable to look for and the flag that makes it
/// print its version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinarySpec {
    pub name: &'static str,
    pub version_flag: &'static str,
}

impl BinarySpec {
    pub const fn new(name: &'static str, version_flag: &'static str) -> Self {
        Self { name, version_flag }
    }
}

/// Checks every catalog row, at most `ctx.concurrency` at a time, and returns the
/// installed ones in catalog order.
pub(crate) async fn probe_binaries(ctx: &ScanContext, specs: &[BinarySpec]) -> Vec<Binary> {
    let found: Vec<Option<Binary>> = stream::iter(specs.iter().copied())
        .map(|spec: BinarySpec| async move {
            if !ctx.exec.exists(spec.name) {
                return None;
            }

            let version = ctx.exec.version(spec.name, spec.version_flag).await;
            let path = ctx.exec.resolve_path(spec.name);
            tracing::debug!("Found {} {} at {}", spec.name, version, path);
            Some(Binary::new(spec.name, version, path))
        })
        .buffered(ctx.concurrency.max(1))
        .collect()
        .await;

    dedup_by_key(found.into_iter().flatten().collect())
}
