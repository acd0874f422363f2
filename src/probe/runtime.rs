use super::catalog::{probe_binaries, BinarySpec};
use super::{Finding, Probe, ScanContext};
use crate::model::ProbeKind;
use anyhow::Result;
use async_trait::async_trait;

pub struct RuntimeProbe;

/// Language runtimes and compilers, in scan order.
pub const RUNTIMES: &[BinarySpec] = &[
    BinarySpec::new("node", "--version"),
    BinarySpec::new("bun", "--version"),
    BinarySpec::new("deno", "--version"),
    BinarySpec::new("python", "--version"),
    BinarySpec::new("python3", "--version"),
    BinarySpec::new("ruby", "--version"),
    BinarySpec::new("java", "-version"),
    BinarySpec::new("go", "version"),
    BinarySpec::new("rust", "--version"),
    BinarySpec::new("rustc", "--version"),
    BinarySpec::new("php", "--version"),
    BinarySpec::new("perl", "--version"),
    BinarySpec::new("dotnet", "--version"),
    BinarySpec::new("swift", "--version"),
    BinarySpec::new("kotlin", "-version"),
    BinarySpec::new("scala", "-version"),
    BinarySpec::new("clang", "--version"),
    BinarySpec::new("gcc", "--version"),
    BinarySpec::new("g++", "--version"),
    BinarySpec::new("zig", "version"),
];

#[async_trait]
impl Probe for RuntimeProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Runtimes
    }

    async fn probe(&self, ctx: &ScanContext) -> Result<Finding> {
        Ok(Finding::Runtimes(probe_binaries(ctx, RUNTIMES).await))
    }
}
