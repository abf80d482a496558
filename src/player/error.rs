//! Error types for playback control

use thiserror::Error;

use crate::library::TrackId;

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Index does not point into the library
    #[error("track index out of range: {0}")]
    IndexOutOfRange(usize),

    /// The track's playable source was released
    #[error("source for track {0} is no longer available")]
    SourceRevoked(TrackId),

    /// The audio thread has shut down
    #[error("audio backend is not running")]
    BackendGone,
}
