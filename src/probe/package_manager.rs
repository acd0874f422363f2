use super::{Finding, Probe, ScanContext};
use crate::model::{dedup_by_key, PackageManager, ProbeKind};
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::sync::LazyLock;

pub struct PackageManagerProbe;

/// How a manager's global listing is turned into package identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    /// `npm`/`pnpm` tree: header line, then `├── name@1.2.3` rows.
    NpmTree,
    /// `yarn global list`: any line mentioning `@`.
    Yarn,
    /// `bun pm ls -g`: tree rows whose first token is `name@version`.
    Bun,
    /// `brew list`: one formula per line, capped.
    Brew,
}

/// Entries kept from `brew list`.
const BREW_LIST_LIMIT: usize = 20;

#[derive(Clone, Copy)]
struct ManagerSpec {
    name: &'static str,
    listing: Option<(&'static str, ListingFormat)>,
}

const fn manager(name: &'static str) -> ManagerSpec {
    ManagerSpec {
        name,
        listing: None,
    }
}

const fn listed(name: &'static str, command: &'static str, format: ListingFormat) -> ManagerSpec {
    ManagerSpec {
        name,
        listing: Some((command, format)),
    }
}

const MANAGERS: &[ManagerSpec] = &[
    listed("npm", "npm list -g --depth=0", ListingFormat::NpmTree),
    listed("yarn", "yarn global list --depth=0", ListingFormat::Yarn),
    listed("pnpm", "pnpm list -g --depth=0", ListingFormat::NpmTree),
    listed("bun", "bun pm ls -g", ListingFormat::Bun),
    listed("brew", "brew list", ListingFormat::Brew),
    manager("apt"),
    manager("dnf"),
    manager("pacman"),
    manager("cargo"),
    manager("pip"),
    manager("pip3"),
    manager("gem"),
    manager("composer"),
];

static NPM_TREE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[├└]──|[+`]--) (.+@[\d.]+)").expect("npm tree pattern is valid")
});

const TREE_GLYPHS: &[char] = &['├', '└', '│', '─', '|', '`', '+', '-', ' '];

impl ListingFormat {
    /// Extracts package identifiers from a listing. Unrecognised output
    /// yields an empty list.
    pub fn parse(&self, output: &str) -> Vec<String> {
        let lines = output.lines().filter(|l| !l.trim().is_empty());

        match self {
            ListingFormat::NpmTree => lines
                .skip(1)
                .filter_map(|line| NPM_TREE_ROW.captures(line))
                .map(|caps| caps[1].to_string())
                .collect(),
            ListingFormat::Yarn => lines
                .filter(|line| line.contains('@'))
                .map(|line| line.trim().to_string())
                .collect(),
            ListingFormat::Bun => lines
                .filter(|line| line.contains('@'))
                .filter_map(|line| {
                    line.trim_start_matches(TREE_GLYPHS)
                        .split_whitespace()
                        .next()
                        .map(str::to_string)
                })
                .collect(),
            ListingFormat::Brew => lines
                .take(BREW_LIST_LIMIT)
                .map(|line| line.trim().to_string())
                .collect(),
        }
    }
}

#[async_trait]
impl Probe for PackageManagerProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::PackageManagers
    }

    async fn probe(&self, ctx: &ScanContext) -> Result<Finding> {
        let found: Vec<Option<PackageManager>> = stream::iter(MANAGERS.iter().copied())
            .map(|spec: ManagerSpec| async move {
                if !ctx.exec.exists(spec.name) {
                    return None;
                }

                let version = ctx.exec.version(spec.name, "--version").await;
                let mut pm = PackageManager::new(spec.name, version);

                if let Some((command, format)) = spec.listing {
                    let packages = format.parse(&ctx.exec.run(command).await);
                    tracing::debug!("{} lists {} global packages", spec.name, packages.len());
                    pm = pm.with_global_packages(packages);
                }

                Some(pm)
            })
            .buffered(ctx.concurrency.max(1))
            .collect()
            .await;

        Ok(Finding::PackageManagers(dedup_by_key(
            found.into_iter().flatten().collect(),
        )))
    }
}
