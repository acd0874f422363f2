use super::{double_quoted, Generator};
use crate::model::Snapshot;

pub struct DockerGenerator;

const BASE_IMAGE: &str = "ubuntu:22.04";

/// Go release pinned in generated images.
const GO_VERSION: &str = "1.21.0";

/// Tools installed from the distribution's package archive.
const APT_TOOLS: &[&str] = &["vim", "tmux", "make", "cmake", "curl", "wget", "jq"];

const BASE_PACKAGES: &[&str] = &[
    "curl",
    "wget",
    "git",
    "sudo",
    "build-essential",
    "software-properties-common",
    "ca-certificates",
    "gnupg",
    "lsb-release",
];

fn push_apt_install(lines: &mut Vec<String>, packages: &[&str]) {
    lines.push("RUN apt-get update && apt-get install -y \\".to_string());
    for package in packages {
        lines.push(format!("    {} \\", package));
    }
    lines.push("    && rm -rf /var/lib/apt/lists/*".to_string());
}

/// Instructions that install one runtime, if the image knows how.
fn runtime_layer(name: &str) -> Option<Vec<String>> {
    let layer: Vec<String> = match name {
        "node" => vec![
            "# Install Node.js".to_string(),
            "RUN curl -fsSL https://deb.nodesource.com/setup_lts.x | bash - && \\".to_string(),
            "    apt-get install -y nodejs".to_string(),
        ],
        "bun" => vec![
            "# Install Bun".to_string(),
            "RUN curl -fsSL https://bun.sh/install | bash".to_string(),
            "ENV PATH=\"/root/.bun/bin:$PATH\"".to_string(),
        ],
        "python" | "python3" => vec![
            "# Install Python".to_string(),
            "RUN apt-get update && apt-get install -y python3 python3-pip".to_string(),
        ],
        "go" => vec![
            "# Install Go".to_string(),
            format!("RUN wget https://go.dev/dl/go{}.linux-amd64.tar.gz && \\", GO_VERSION),
            format!("    tar -C /usr/local -xzf go{}.linux-amd64.tar.gz && \\", GO_VERSION),
            format!("    rm go{}.linux-amd64.tar.gz", GO_VERSION),
            "ENV PATH=\"/usr/local/go/bin:$PATH\"".to_string(),
        ],
        "rust" | "rustc" => vec![
            "# Install Rust".to_string(),
            "RUN curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y"
                .to_string(),
            "ENV PATH=\"/root/.cargo/bin:$PATH\"".to_string(),
        ],
        _ => return None,
    };
    Some(layer)
}

impl Generator for DockerGenerator {
    fn extension(&self) -> &'static str {
        ".Dockerfile"
    }

    fn generate(&self, snapshot: &Snapshot) -> String {
        let mut lines = vec![
            "# Developer Environment Dockerfile".to_string(),
            format!("# Generated on {}", snapshot.timestamp.to_rfc3339()),
            String::new(),
            format!("FROM {}", BASE_IMAGE),
            String::new(),
            "# Prevent interactive prompts during package installation".to_string(),
            "ENV DEBIAN_FRONTEND=noninteractive".to_string(),
            String::new(),
            "# Update and install basic tools".to_string(),
        ];
        push_apt_install(&mut lines, BASE_PACKAGES);
        lines.push(String::new());

        let layers: Vec<Vec<String>> = snapshot
            .runtimes
            .iter()
            .filter_map(|runtime| runtime_layer(&runtime.name))
            .collect();
        if !layers.is_empty() {
            lines.push("# Install Programming Runtimes".to_string());
            for layer in layers {
                lines.extend(layer);
                lines.push(String::new());
            }
        }

        if !snapshot.tools.is_empty() {
            let apt_tools: Vec<&str> = snapshot
                .tools
                .iter()
                .map(|t| t.name.as_str())
                .filter(|name| APT_TOOLS.contains(name))
                .collect();
            let has_docker = snapshot.tools.iter().any(|t| t.name == "docker");

            if !apt_tools.is_empty() || has_docker {
                lines.push("# Install Development Tools".to_string());
            }
            if !apt_tools.is_empty() {
                push_apt_install(&mut lines, &apt_tools);
                lines.push(String::new());
            }
            if has_docker {
                lines.push("# Install Docker".to_string());
                lines.push("RUN curl -fsSL https://get.docker.com | sh".to_string());
                lines.push(String::new());
            }
        }

        if let Some(git) = &snapshot.git {
            lines.push("# Configure Git".to_string());
            if let Some(name) = &git.user_name {
                lines.push(format!("RUN git config --global user.name {}", double_quoted(name)));
            }
            if let Some(email) = &git.user_email {
                lines.push(format!(
                    "RUN git config --global user.email {}",
                    double_quoted(email)
                ));
            }
            lines.push(String::new());
        }

        lines.push("# Set working directory".to_string());
        lines.push("WORKDIR /workspace".to_string());
        lines.push(String::new());
        lines.push("# Default command".to_string());
        lines.push("CMD [\"/bin/bash\"]".to_string());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Binary, GitConfig, SystemInfo};

    #[test]
    fn test_runtime_layers() {
        let mut snapshot = Snapshot::new(SystemInfo::default());
        snapshot.runtimes = vec![
            Binary::new("python3", "3.11.4", "/usr/bin/python3"),
            Binary::new("perl", "5.36.0", "/usr/bin/perl"),
            Binary::new("go", "1.22.0", "/usr/local/go/bin/go"),
        ];

        let dockerfile = DockerGenerator.generate(&snapshot);
        assert!(dockerfile.contains("FROM ubuntu:22.04\n"));
        assert!(dockerfile.contains("RUN apt-get update && apt-get install -y python3 python3-pip\n"));
        assert!(dockerfile.contains("go1.21.0.linux-amd64.tar.gz"));
        assert!(!dockerfile.contains("perl"));

        let python = dockerfile.find("# Install Python").unwrap();
        let go = dockerfile.find("# Install Go").unwrap();
        assert!(python < go);
    }

    #[test]
    fn test_tools_and_git() {
        let mut snapshot = Snapshot::new(SystemInfo::default());
        snapshot.tools = vec![
            Binary::new("jq", "1.7.1", "/usr/bin/jq"),
            Binary::new("docker", "24.0.5", "/usr/bin/docker"),
            Binary::new("tmux", "3.3a", "/usr/bin/tmux"),
        ];
        snapshot.git = Some(GitConfig {
            user_email: Some("dev@example.com".to_string()),
            ..Default::default()
        });

        let dockerfile = DockerGenerator.generate(&snapshot);
        assert!(dockerfile.contains(
            "RUN apt-get update && apt-get install -y \\\n    jq \\\n    tmux \\\n    && rm -rf /var/lib/apt/lists/*\n"
        ));
        assert!(dockerfile.contains("RUN curl -fsSL https://get.docker.com | sh\n"));
        assert!(dockerfile.contains("RUN git config --global user.email \"dev@example.com\"\n"));
        assert!(!dockerfile.contains("user.name"));
        assert!(dockerfile.ends_with("CMD [\"/bin/bash\"]"));
    }

    #[test]
    fn test_minimal_image() {
        let dockerfile = DockerGenerator.generate(&Snapshot::new(SystemInfo::default()));
        assert!(!dockerfile.contains("# Install Programming Runtimes"));
        assert!(!dockerfile.contains("# Install Development Tools"));
        assert!(dockerfile.contains("WORKDIR /workspace\n"));
    }
}
