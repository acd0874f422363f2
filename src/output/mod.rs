//! Rendering of snapshots and comparison results.

mod json;
mod report;
mod summary;
mod yaml;

pub use json::format_json;
pub use report::{render_differences, render_validation};
pub use summary::render_summary;
pub use yaml::format_yaml;

use crate::error::{Error, Result};
use crate::generate::{generate, GeneratorKind};
use crate::model::Snapshot;

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable grouped listing
    Summary,
    /// Snapshot JSON, the interchange format
    Json,
    /// Simplified YAML rendering of the snapshot
    Yaml,
    /// Provisioning script rebuilt from the snapshot
    Script,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "script" | "bash" => Ok(OutputFormat::Script),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Format a snapshot to a string for stdout or a single output file.
pub fn format_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Summary => Ok(render_summary(snapshot)),
        OutputFormat::Json => format_json(snapshot),
        OutputFormat::Yaml => format_yaml(snapshot),
        OutputFormat::Script => generate(snapshot, GeneratorKind::Bash),
    }
}
