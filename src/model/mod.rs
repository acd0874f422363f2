//! Core data types for snapshots and the inventory they carry.
//!
//! This module contains the entity graph produced by a scan:
//!
//! - [`Snapshot`] - The complete, immutable record of one scan
//! - [`SystemInfo`] - Host facts that are always present
//! - [`PackageManager`], [`Runtime`], [`Tool`], [`Extension`] - Keyed inventory entries
//! - [`GitConfig`], [`ShellConfig`], [`EditorIntegration`] - Optional configuration domains
//! - [`ProbeKind`] - The domain a probe inspects
//! - [`Platform`] - Operating system platform
//!
//! # Example
//!
//! ```
//! use devenv::model::{Binary, Snapshot, SystemInfo};
//!
//! let mut snapshot = Snapshot::new(SystemInfo::default());
//! snapshot.runtimes.push(Binary::new("node", "20.11.0", "/usr/bin/node"));
//!
//! println!("{} runtimes", snapshot.runtimes.len());
//! ```

mod inventory;
mod snapshot;

pub use inventory::*;
pub use snapshot::*;
