pub mod compose;
pub mod config;
pub mod diff;
pub mod env;
pub mod error;
pub mod exec;
pub mod generate;
pub mod model;
pub mod output;
pub mod platform;
pub mod probe;
pub mod validate;

pub use compose::{select_probes, Composer};
pub use config::Config;
pub use diff::{diff, Differences};
pub use env::HostEnv;
pub use error::{Error, Result};
pub use model::{Platform, ProbeKind, Snapshot};
pub use probe::{Probe, ScanContext};
pub use validate::{reconcile, validate, Outcome, Validation};
