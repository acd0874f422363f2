use super::catalog::{probe_binaries, BinarySpec};
use super::{Finding, Probe, ScanContext};
use crate::model::ProbeKind;
use anyhow::Result;
use async_trait::async_trait;

pub struct ToolProbe;

/// Editors, container and cloud clients, database shells and build tools.
pub const TOOLS: &[BinarySpec] = &[
    BinarySpec::new("git", "--version"),
    BinarySpec::new("docker", "--version"),
    BinarySpec::new("docker-compose", "--version"),
    BinarySpec::new("kubectl", "version --client"),
    BinarySpec::new("terraform", "version"),
    BinarySpec::new("ansible", "--version"),
    BinarySpec::new("vagrant", "--version"),
    BinarySpec::new("vim", "--version"),
    BinarySpec::new("nvim", "--version"),
    BinarySpec::new("emacs", "--version"),
    BinarySpec::new("code", "--version"),
    BinarySpec::new("subl", "--version"),
    BinarySpec::new("atom", "--version"),
    BinarySpec::new("tmux", "-V"),
    BinarySpec::new("screen", "--version"),
    BinarySpec::new("zsh", "--version"),
    BinarySpec::new("bash", "--version"),
    BinarySpec::new("fish", "--version"),
    BinarySpec::new("make", "--version"),
    BinarySpec::new("cmake", "--version"),
    BinarySpec::new("gradle", "--version"),
    BinarySpec::new("maven", "--version"),
    BinarySpec::new("mvn", "--version"),
    BinarySpec::new("bazel", "--version"),
    BinarySpec::new("aws", "--version"),
    BinarySpec::new("gcloud", "--version"),
    BinarySpec::new("az", "--version"),
    BinarySpec::new("heroku", "--version"),
    BinarySpec::new("netlify", "--version"),
    BinarySpec::new("vercel", "--version"),
    BinarySpec::new("gh", "--version"),
    BinarySpec::new("hub", "--version"),
    BinarySpec::new("jq", "--version"),
    BinarySpec::new("yq", "--version"),
    BinarySpec::new("curl", "--version"),
    BinarySpec::new("wget", "--version"),
    BinarySpec::new("httpie", "--version"),
    BinarySpec::new("postman", "--version"),
    BinarySpec::new("insomnia", "--version"),
    BinarySpec::new("ngrok", "version"),
    BinarySpec::new("redis-cli", "--version"),
    BinarySpec::new("mongo", "--version"),
    BinarySpec::new("mongosh", "--version"),
    BinarySpec::new("psql", "--version"),
    BinarySpec::new("mysql", "--version"),
    BinarySpec::new("sqlite3", "--version"),
];

#[async_trait]
impl Probe for ToolProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Tools
    }

    async fn probe(&self, ctx: &ScanContext) -> Result<Finding> {
        Ok(Finding::Tools(probe_binaries(ctx, TOOLS).await))
    }
}
