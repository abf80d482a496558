//! Audio-related small types and handles.
//!
//! Commands flow into the audio thread, events flow back out, and the
//! shared `PlaybackInfo` lets the view read progress without a round trip.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::player::LoadId;

#[derive(Debug)]
pub enum AudioCmd {
    /// Bind a new source, paused at the start.
    Load(LoadId, PathBuf),
    /// Start or resume the bound source.
    Play,
    Pause,
    /// Jump to an absolute offset in the bound source.
    SeekTo(Duration),
    /// Linear gain; values above 1.0 amplify.
    SetGain(f32),
    /// Drop the bound source.
    Stop,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// The bound source started playing.
    Started,
    /// The source could not be opened or decoded.
    StartFailed(String),
    /// The decoder knows the total length of the bound source.
    DurationKnown(Duration),
    /// The source played through to its end.
    Ended,
    /// Playback stopped for a reason other than reaching the end.
    Error(String),
}

/// An event together with the load of the source that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub load: LoadId,
    pub event: AudioEvent,
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Position inside the bound source.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open audio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("no audio output device: {0}")]
    NoDevice(String),
}
