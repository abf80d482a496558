//! Audio output: a dedicated thread owning the rodio stream and sink.
//!
//! The rest of the app talks to it through `AudioPlayer`, which implements
//! the player's `MediaBackend` seam.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioEvent, PlaybackHandle, PlaybackInfo, SourceEvent};

#[cfg(test)]
mod tests;
