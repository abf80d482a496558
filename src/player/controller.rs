use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

use crate::library::{LibraryStore, Track, TrackId};
use crate::notify::Notifier;

use super::backend::{LoadId, MediaBackend};
use super::error::PlaybackError;
use super::state::{PlaybackState, PlayerStatus, RepeatMode};
use super::volume::VolumeControl;

/// Owns the playback state and drives a `MediaBackend`.
///
/// The library is passed into each command rather than stored, so the
/// controller never holds a stale copy of the track list.
pub struct PlaybackController<B: MediaBackend> {
    backend: B,
    state: PlaybackState,
    /// The load whose events still apply; `None` while nothing is bound.
    loaded: Option<LoadId>,
    volume: VolumeControl,
    rng: StdRng,
    notifier: Notifier,
}

impl<B: MediaBackend> PlaybackController<B> {
    pub fn new(backend: B, notifier: Notifier, initial_volume: u16) -> Self {
        Self {
            backend,
            state: PlaybackState::default(),
            loaded: None,
            volume: VolumeControl::new(initial_volume),
            rng: StdRng::from_rng(&mut rand::rng()),
            notifier,
        }
    }

    /// Replace the random source used for shuffle picks.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn status(&self) -> PlayerStatus {
        self.state.status
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_track_id(&self) -> Option<&TrackId> {
        self.state.current_track_id.as_ref()
    }

    pub fn current_track<'a>(&self, library: &'a LibraryStore) -> Option<&'a Track> {
        self.state
            .current_track_id
            .as_ref()
            .and_then(|id| library.track(id))
    }

    pub fn loaded(&self) -> Option<LoadId> {
        self.loaded
    }

    /// Whether an event stamped with `load` belongs to the bound source.
    pub fn is_current(&self, load: LoadId) -> bool {
        self.loaded == Some(load)
    }

    pub fn volume(&self) -> &VolumeControl {
        &self.volume
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Push the current effective gain to the backend.
    pub fn sync_gain(&mut self) -> Result<(), PlaybackError> {
        self.backend.set_gain(self.volume.effective_gain())
    }

    pub fn play_track_at(
        &mut self,
        library: &LibraryStore,
        index: usize,
    ) -> Result<(), PlaybackError> {
        let track = library
            .get(index)
            .ok_or(PlaybackError::IndexOutOfRange(index))?;
        let path = library
            .resources()
            .audio_path(track.source)
            .ok_or_else(|| PlaybackError::SourceRevoked(track.id.clone()))?;

        self.state.current_track_id = Some(track.id.clone());
        self.state.current_index = index;

        self.loaded = Some(self.backend.load(path)?);
        self.state.status = PlayerStatus::Loaded;
        self.backend.play()?;
        self.state.status = PlayerStatus::Playing;

        info!(index, title = %track.title, "playing");
        self.notifier.changed();
        Ok(())
    }

    pub fn toggle_play_pause(&mut self, library: &LibraryStore) -> Result<(), PlaybackError> {
        match self.state.status {
            PlayerStatus::Empty => {
                if library.is_empty() {
                    return Ok(());
                }
                self.play_track_at(library, 0)
            }
            PlayerStatus::Loaded | PlayerStatus::Paused => {
                self.backend.play()?;
                self.state.status = PlayerStatus::Playing;
                self.notifier.changed();
                Ok(())
            }
            PlayerStatus::Playing => {
                self.backend.pause()?;
                self.state.status = PlayerStatus::Paused;
                self.notifier.changed();
                Ok(())
            }
        }
    }

    pub fn next(&mut self, library: &LibraryStore) -> Result<(), PlaybackError> {
        let len = library.len();
        if len == 0 {
            return Ok(());
        }
        let index = if self.state.shuffled {
            self.rng.random_range(0..len)
        } else if self.state.current_index + 1 >= len {
            0
        } else {
            self.state.current_index + 1
        };
        self.play_track_at(library, index)
    }

    pub fn previous(&mut self, library: &LibraryStore) -> Result<(), PlaybackError> {
        let len = library.len();
        if len == 0 {
            return Ok(());
        }
        let index = if self.state.shuffled {
            self.rng.random_range(0..len)
        } else if self.state.current_index == 0 || self.state.current_index >= len {
            len - 1
        } else {
            self.state.current_index - 1
        };
        self.play_track_at(library, index)
    }

    /// The backend finished the current source.
    pub fn on_track_ended(&mut self, library: &LibraryStore) -> Result<(), PlaybackError> {
        let is_last = self.state.current_index + 1 >= library.len();
        match self.state.repeat {
            RepeatMode::One => {
                self.backend.seek(Duration::ZERO)?;
                self.backend.play()?;
                self.state.status = PlayerStatus::Playing;
                self.notifier.changed();
                Ok(())
            }
            RepeatMode::All => self.next(library),
            RepeatMode::None if !is_last => self.next(library),
            RepeatMode::None => {
                debug!("end of library reached");
                self.backend.pause()?;
                self.state.status = PlayerStatus::Paused;
                self.notifier.changed();
                Ok(())
            }
        }
    }

    /// The backend could not start the bound source. The state stays as is.
    pub fn on_start_failed(&mut self, reason: &str) {
        error!(reason, "playback failed to start");
        self.notifier.error("Could not play this track");
    }

    /// The backend hit an error mid-playback; skip ahead.
    pub fn on_playback_error(
        &mut self,
        library: &LibraryStore,
        reason: &str,
    ) -> Result<(), PlaybackError> {
        error!(reason, "playback error");
        self.notifier.error("Playback error, skipping track");
        self.next(library)
    }

    pub fn set_volume(&mut self, percent: u16) -> Result<(), PlaybackError> {
        self.set_volume_at(percent, Instant::now())
    }

    pub fn set_volume_at(&mut self, percent: u16, now: Instant) -> Result<(), PlaybackError> {
        let change = self.volume.set_percent(percent, now);
        self.backend.set_gain(change.gain)?;
        if change.warn {
            self.notifier
                .warning(format!("Volume boosted: {}%", self.volume.percent()));
        }
        self.notifier.changed();
        Ok(())
    }

    pub fn toggle_mute(&mut self) -> Result<(), PlaybackError> {
        let gain = self.volume.toggle_mute();
        self.backend.set_gain(gain)?;
        self.notifier.changed();
        Ok(())
    }

    /// Seek to `fraction` of the current track's length.
    pub fn seek(&mut self, library: &LibraryStore, fraction: f64) -> Result<(), PlaybackError> {
        let Some(duration) = self.seekable_duration(library) else {
            return Ok(());
        };
        let position = duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.backend.seek(position)
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, library: &LibraryStore, seconds: i64) -> Result<(), PlaybackError> {
        let Some(duration) = self.seekable_duration(library) else {
            return Ok(());
        };
        let delta = Duration::from_secs(seconds.unsigned_abs());
        let elapsed = self.backend.elapsed();
        let position = if seconds < 0 {
            elapsed.saturating_sub(delta)
        } else {
            (elapsed + delta).min(duration)
        };
        self.backend.seek(position)
    }

    fn seekable_duration(&self, library: &LibraryStore) -> Option<Duration> {
        if self.state.status == PlayerStatus::Empty {
            return None;
        }
        self.current_track(library)
            .map(|t| t.duration)
            .filter(|d| !d.is_zero())
    }

    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.state.shuffled);
        let msg = if self.state.shuffled {
            "Shuffle on"
        } else {
            "Shuffle off"
        };
        self.notifier.info(msg);
    }

    pub fn set_shuffle(&mut self, shuffled: bool) {
        self.state.shuffled = shuffled;
        self.notifier.changed();
    }

    pub fn cycle_repeat(&mut self) {
        self.set_repeat(self.state.repeat.cycle());
        self.notifier
            .info(format!("Repeat {}", self.state.repeat.label()));
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.state.repeat = mode;
        self.notifier.changed();
    }

    /// Reconcile with a library that no longer contains `removed`.
    pub fn forget_track(
        &mut self,
        library: &LibraryStore,
        removed: &TrackId,
    ) -> Result<(), PlaybackError> {
        match self.state.current_track_id.as_ref() {
            Some(current) if current == removed => {
                self.state.current_track_id = None;
                self.state.current_index = 0;
                self.state.status = PlayerStatus::Empty;
                self.loaded = None;
                self.backend.stop()?;
            }
            Some(current) => {
                self.state.current_index = library.index_of(current).unwrap_or(0);
            }
            None => {}
        }
        self.notifier.changed();
        Ok(())
    }
}
