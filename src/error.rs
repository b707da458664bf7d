use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort the run.
///
/// Per-file and per-path problems never reach this type; they are reported
/// and skipped where they occur.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no matching image files found")]
    NoFilesFound,

    #[error("failed to write output '{path}': {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}
