//! Provisioning artifacts rebuilt from a snapshot.
//!
//! Generators are pure text templates: they read a [`Snapshot`] and return
//! the file contents. Writing the file is left to [`write_artifact`].

mod bash;
mod docker;

pub use bash::BashGenerator;
pub use docker::DockerGenerator;

use crate::error::{Error, Result};
use crate::model::Snapshot;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output file name, without extension.
pub const DEFAULT_BASE_NAME: &str = "setup";

/// Renders one kind of provisioning artifact.
pub trait Generator {
    /// File extension appended to the output name.
    fn extension(&self) -> &'static str;

    fn generate(&self, snapshot: &Snapshot) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Bash,
    Docker,
    Ansible,
}

impl GeneratorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Bash => "bash",
            GeneratorKind::Docker => "docker",
            GeneratorKind::Ansible => "ansible",
        }
    }

    /// Returns the generator, or an error for kinds that have none yet.
    pub fn generator(&self) -> Result<Box<dyn Generator>> {
        match self {
            GeneratorKind::Bash => Ok(Box::new(BashGenerator)),
            GeneratorKind::Docker => Ok(Box::new(DockerGenerator)),
            GeneratorKind::Ansible => {
                Err(Error::UnimplementedGenerator("Ansible playbook".to_string()))
            }
        }
    }
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GeneratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bash" | "sh" => Ok(GeneratorKind::Bash),
            "docker" | "dockerfile" => Ok(GeneratorKind::Docker),
            "ansible" => Ok(GeneratorKind::Ansible),
            _ => Err(Error::UnknownGenerator(s.to_string())),
        }
    }
}

pub fn generate(snapshot: &Snapshot, kind: GeneratorKind) -> Result<String> {
    Ok(kind.generator()?.generate(snapshot))
}

/// Resolves the output path for a generator, appending its extension unless
/// the name already carries it.
pub fn output_path(output: Option<&str>, generator: &dyn Generator) -> PathBuf {
    let name = output.unwrap_or(DEFAULT_BASE_NAME);
    if name.ends_with(generator.extension()) {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{}{}", name, generator.extension()))
    }
}

/// Writes an artifact, marking it executable on unix when asked.
pub fn write_artifact(path: &Path, content: &str, executable: bool) -> Result<()> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::write(path, content).map_err(write_err)?;

    #[cfg(unix)]
    if executable {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path).map_err(write_err)?.permissions();
        perms.set_mode(perms.mode() | 0o111);
        fs::set_permissions(path, perms).map_err(write_err)?;
    }
    #[cfg(not(unix))]
    let _ = executable;

    tracing::debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

/// Quotes a value for use inside a double-quoted shell string.
pub(crate) fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Leaves plain identifiers bare and double-quotes anything else, so a value
/// taken from a snapshot is always one shell word.
pub(crate) fn shell_word(value: &str) -> String {
    let plain = !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '/' | ':' | '+' | '=' | '-')
        });
    if plain {
        value.to_string()
    } else {
        double_quoted(value)
    }
}
