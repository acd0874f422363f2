use super::{Finding, Probe, ScanContext};
use crate::model::{ProbeKind, ShellConfig};
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

pub struct ShellProbe;

/// Environment variables copied into the snapshot; everything else is
/// ignored.
pub const EXPORTED_VARS: &[&str] = &["NODE_ENV", "EDITOR", "VISUAL", "PAGER", "LANG", "LC_ALL"];

/// Prefixes outside the home directory whose PATH entries are recorded.
const OPTIONAL_SOFTWARE_PREFIXES: &[&str] = &["/usr/local", "/opt"];

static ALIAS_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^alias\s+(\S+)='(.+)'$").expect("alias pattern is valid"),
        Regex::new(r"^(\S+)='(.+)'$").expect("alias pattern is valid"),
        Regex::new(r"^alias\s+(\S+)\s+'(.+)'$").expect("alias pattern is valid"),
    ]
});

/// Candidate rc files, relative to the home directory.
pub fn config_candidates(shell: &str) -> &'static [&'static str] {
    match shell {
        "bash" => &[".bashrc", ".bash_profile", ".profile"],
        "zsh" => &[".zshrc", ".zprofile", ".zshenv"],
        "fish" => &[".config/fish/config.fish"],
        _ => &[".profile"],
    }
}

/// The command that prints the user's aliases, if the shell has one.
///
/// bash and zsh only load aliases in interactive mode.
fn alias_command(shell: &str) -> Option<String> {
    match shell {
        "bash" | "zsh" => Some(format!("{} -ic alias", shell)),
        "fish" => Some("fish -c alias".to_string()),
        _ => None,
    }
}

/// Parses `alias NAME='VALUE'`, `NAME='VALUE'` and fish's `alias NAME 'VALUE'`.
pub(crate) fn parse_aliases(output: &str) -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = ALIAS_PATTERNS.iter().find_map(|re| re.captures(line)) {
            aliases.insert(caps[1].to_string(), caps[2].to_string());
        }
    }

    aliases
}

fn path_additions(entries: &[std::path::PathBuf], home: Option<&Path>) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| {
            home.is_some_and(|h| !h.as_os_str().is_empty() && entry.starts_with(h))
                || OPTIONAL_SOFTWARE_PREFIXES.iter().any(|p| entry.starts_with(p))
        })
        .map(|entry| entry.to_string_lossy().to_string())
        .collect()
}

fn non_empty<C: Default + PartialEq>(c: C) -> Option<C> {
    if c == C::default() {
        None
    } else {
        Some(c)
    }
}

#[async_trait]
impl Probe for ShellProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Shell
    }

    async fn probe(&self, ctx: &ScanContext) -> Result<Finding> {
        let env = &ctx.env;
        let shell = env.shell_name().unwrap_or_else(|| "unknown".to_string());

        let config_files: Vec<String> = match env.home() {
            Some(home) => config_candidates(&shell)
                .iter()
                .filter(|f| home.join(f).is_file())
                .map(|f| f.to_string())
                .collect(),
            None => Vec::new(),
        };

        let aliases = match alias_command(&shell) {
            Some(command) => parse_aliases(&ctx.exec.run(&command).await),
            None => BTreeMap::new(),
        };

        let exports: BTreeMap<String, String> = EXPORTED_VARS
            .iter()
            .filter_map(|key| env.var(key).map(|v| (key.to_string(), v.to_string())))
            .collect();

        let path_additions = path_additions(&env.path_entries(), env.home());

        Ok(Finding::Shell(Some(ShellConfig {
            shell,
            config_files,
            aliases: non_empty(aliases),
            exports: non_empty(exports),
            path_additions: non_empty(path_additions),
        })))
    }
}
