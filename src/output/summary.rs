use crate::model::{Binary, Snapshot};
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

/// Tool groups shown in the summary; tools not listed land in "other".
const TOOL_GROUPS: &[(&str, &[&str])] = &[
    ("editors", &["vim", "nvim", "emacs", "code", "subl", "atom"]),
    ("containers", &["docker", "docker-compose", "kubectl", "podman"]),
    ("cloud", &["aws", "gcloud", "az", "terraform", "ansible"]),
    ("databases", &["redis-cli", "mongo", "mongosh", "psql", "mysql", "sqlite3"]),
    ("shells", &["bash", "zsh", "fish", "tmux", "screen"]),
];

#[derive(Tabled)]
struct ManagerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Global Packages")]
    global_packages: String,
}

#[derive(Tabled)]
struct BinaryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Path")]
    path: String,
}

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
}

fn tool_group(name: &str) -> &'static str {
    TOOL_GROUPS
        .iter()
        .find(|(_, members)| members.contains(&name))
        .map(|(group, _)| *group)
        .unwrap_or("other")
}

fn format_version(version: &str) -> String {
    if version == crate::exec::UNKNOWN_VERSION {
        "-".to_string()
    } else {
        version.to_string()
    }
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

fn binary_rows(binaries: &[Binary]) -> Vec<BinaryRow> {
    binaries
        .iter()
        .map(|b| BinaryRow {
            name: b.name.clone(),
            version: format_version(&b.version),
            path: or_dash(&b.path),
        })
        .collect()
}

/// Renders the human-readable scan summary.
pub fn render_summary(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let system = &snapshot.system;

    let _ = writeln!(out);
    let _ = writeln!(out, "System Information");
    let _ = writeln!(out, "  OS: {}", system.os);
    let _ = writeln!(out, "  Architecture: {}", system.arch);
    let _ = writeln!(out, "  Hostname: {}", system.hostname);
    let _ = writeln!(out, "  Shell: {}", system.shell);
    let _ = writeln!(out, "  User: {}", system.username);

    if !snapshot.package_managers.is_empty() {
        let rows: Vec<ManagerRow> = snapshot
            .package_managers
            .iter()
            .map(|pm| ManagerRow {
                name: pm.name.clone(),
                version: format_version(&pm.version),
                global_packages: pm
                    .global_packages
                    .as_ref()
                    .map(|p| format!("{} installed", p.len()))
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        let _ = writeln!(out);
        let _ = writeln!(out, "Package Managers ({}):", rows.len());
        let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()).to_string());
    }

    if !snapshot.runtimes.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Programming Runtimes ({}):", snapshot.runtimes.len());
        let table = Table::new(binary_rows(&snapshot.runtimes)).with(Style::rounded()).to_string();
        let _ = writeln!(out, "{}", table);
    }

    if !snapshot.tools.is_empty() {
        let groups = TOOL_GROUPS
            .iter()
            .map(|(group, _)| *group)
            .chain(std::iter::once("other"));
        let rows: Vec<ToolRow> = groups
            .flat_map(|group| {
                snapshot
                    .tools
                    .iter()
                    .filter(move |t| tool_group(&t.name) == group)
                    .map(move |t| ToolRow {
                        group: group.to_string(),
                        name: t.name.clone(),
                        version: format_version(&t.version),
                    })
            })
            .collect();

        let _ = writeln!(out);
        let _ = writeln!(out, "Development Tools ({}):", rows.len());
        let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()).to_string());
    }

    if let Some(git) = &snapshot.git {
        let _ = writeln!(out);
        let _ = writeln!(out, "Git Configuration");
        if let Some(name) = &git.user_name {
            let _ = writeln!(out, "  User: {}", name);
        }
        if let Some(email) = &git.user_email {
            let _ = writeln!(out, "  Email: {}", email);
        }
        if let Some(branch) = &git.default_branch {
            let _ = writeln!(out, "  Default branch: {}", branch);
        }
        if let Some(aliases) = &git.aliases {
            let _ = writeln!(out, "  Aliases: {} configured", aliases.len());
        }
    }

    if let Some(shell) = &snapshot.shell {
        let _ = writeln!(out);
        let _ = writeln!(out, "Shell Configuration");
        let _ = writeln!(out, "  Shell: {}", shell.shell);
        if !shell.config_files.is_empty() {
            let _ = writeln!(out, "  Config files: {}", shell.config_files.join(", "));
        }
        if let Some(aliases) = &shell.aliases {
            let _ = writeln!(out, "  Aliases: {} configured", aliases.len());
        }
    }

    if let Some(editor) = &snapshot.editor_integration {
        let _ = writeln!(out);
        let _ = writeln!(out, "Editor Integration");
        let _ = writeln!(out, "  Extensions: {} installed", editor.extensions.len());
        if let Some(settings) = &editor.settings {
            let _ = writeln!(out, "  Settings: {} keys", settings.len());
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Scan completed at: {}",
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Use --format json or --format script to export the configuration");

    out
}
