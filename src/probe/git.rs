use super::{Finding, Probe, ScanContext};
use crate::model::{GitConfig, ProbeKind};
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub struct GitProbe;

static ALIAS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^alias\.(\S+)\s+(.+)$").expect("alias pattern is valid"));

/// Parses `git config --get-regexp "^alias\."` output into name → command.
pub(crate) fn parse_aliases(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| ALIAS_LINE.captures(line.trim()))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[async_trait]
impl Probe for GitProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Git
    }

    async fn probe(&self, ctx: &ScanContext) -> Result<Finding> {
        if !ctx.exec.exists("git") {
            return Ok(Finding::Git(None));
        }

        let (user_name, user_email, default_branch, alias_output) = tokio::join!(
            ctx.exec.run("git config --global user.name"),
            ctx.exec.run("git config --global user.email"),
            ctx.exec.run("git config --global init.defaultBranch"),
            ctx.exec.run(r#"git config --get-regexp "^alias\.""#),
        );

        let aliases = parse_aliases(&alias_output);
        let config = GitConfig {
            user_name: non_empty(user_name),
            user_email: non_empty(user_email),
            default_branch: non_empty(default_branch),
            aliases: if aliases.is_empty() {
                None
            } else {
                Some(aliases)
            },
        };

        if config.is_empty() {
            Ok(Finding::Git(None))
        } else {
            Ok(Finding::Git(Some(config)))
        }
    }
}
