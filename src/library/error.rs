use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Nothing in the batch had a supported audio extension.
    #[error("no supported audio files were selected")]
    NoValidFiles,

    #[error("failed to read tags from {path}: {reason}")]
    Tags { path: PathBuf, reason: String },

    #[error("failed to probe duration of {path}: {reason}")]
    Probe { path: PathBuf, reason: String },
}
