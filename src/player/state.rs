use crate::config::RepeatSetting;
use crate::library::TrackId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    /// Nothing has been played yet.
    #[default]
    Empty,
    /// A source is bound but not started.
    Loaded,
    Playing,
    Paused,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    None,
    /// Replay the current track when it ends.
    One,
    /// Wrap around to the first track after the last.
    All,
}

impl RepeatMode {
    /// `None -> All -> One -> None`.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::None => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(s: RepeatSetting) -> Self {
        match s {
            RepeatSetting::None => RepeatMode::None,
            RepeatSetting::All => RepeatMode::All,
            RepeatSetting::One => RepeatMode::One,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub current_track_id: Option<TrackId>,
    /// Position in the flat track list; drives next/previous.
    pub current_index: usize,
    pub status: PlayerStatus,
    pub shuffled: bool,
    pub repeat: RepeatMode,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.status == PlayerStatus::Playing
    }
}
