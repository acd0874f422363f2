//! Error types for the command boundary.
//!
//! Probes never surface errors: missing software is data, not failure. The
//! variants here cover what can go wrong around a scan (reading or writing
//! snapshot files, unknown formats, bad probe names), which is fatal to the
//! current invocation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Snapshot file could not be read.
    #[error("Failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not valid snapshot JSON.
    #[error("Failed to parse snapshot {path}: {source}")]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Output file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown format: {0}. Use 'json', 'yaml', 'script', or 'summary'")]
    UnknownFormat(String),

    #[error("Unknown script type: {0}. Use 'bash' or 'docker'")]
    UnknownGenerator(String),

    #[error("{0} generation is not yet implemented")]
    UnimplementedGenerator(String),

    /// Include/exclude named a probe that does not exist.
    #[error("{0}")]
    UnknownProbe(String),

    #[error("Invalid config at {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
