//! Playback control: what is playing, what plays next, and how loud.

mod backend;
mod controller;
mod error;
mod state;
mod volume;

pub use backend::{LoadId, MediaBackend};
pub use controller::PlaybackController;
pub use error::PlaybackError;
pub use state::{PlayerStatus, RepeatMode};
pub use volume::MAX_VOLUME_PERCENT;

#[cfg(test)]
mod tests;
