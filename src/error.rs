// error.rs - Input error taxonomy
// Purpose: The only failures allowed to escape the probing engine. Transport and
//          provider CLI failures are recorded as values, never raised.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("bucket list not found: {}", .0.display())]
    ListNotFound(PathBuf),

    #[error("failed to read bucket list {}: {source}", .path.display())]
    ListUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid status codes: {0} (expected e.g. 200,403,404)")]
    InvalidStatusFilter(String),

    #[error("no bucket names supplied; pass names directly or use --list <file>")]
    NoTargets,

    #[error("worker count must be at least 1")]
    InvalidWorkers,

    #[error("timeout must be at least 1 second")]
    InvalidTimeout,
}
