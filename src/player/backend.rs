use std::path::Path;
use std::time::Duration;

use super::error::PlaybackError;

/// Identifies one `load` call. Events the backend reports are stamped with
/// the load they belong to, so late events from a replaced source can be
/// told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadId(pub u64);

/// The media element the controller drives.
///
/// Calls are requests: a `load` that cannot decode the file still returns
/// `Ok` here and is reported later as an asynchronous start failure.
pub trait MediaBackend {
    fn load(&mut self, path: &Path) -> Result<LoadId, PlaybackError>;
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self) -> Result<(), PlaybackError>;
    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError>;
    /// Linear gain; above 1.0 amplifies.
    fn set_gain(&mut self, gain: f32) -> Result<(), PlaybackError>;
    fn stop(&mut self) -> Result<(), PlaybackError>;
    /// Current position inside the bound source.
    fn elapsed(&self) -> Duration;
}
