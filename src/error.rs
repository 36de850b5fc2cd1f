use std::path::PathBuf;

use thiserror::Error;

/// Failures of the durable state slot. None of these are fatal to an editing
/// session; callers log them and keep the in-memory state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read state slot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write state slot {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("saved state is not valid: {0}")]
    Format(#[from] serde_json::Error),
    #[error("no data directory available for the default state slot")]
    NoDataDir,
}
