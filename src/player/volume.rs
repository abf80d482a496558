//! Volume, boost and mute bookkeeping.

use std::time::{Duration, Instant};

pub const MAX_VOLUME_PERCENT: u16 = 200;

/// Minimum spacing between two "volume boosted" warnings.
const BOOST_WARNING_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeChange {
    /// Gain to hand to the backend.
    pub gain: f32,
    pub boosted: bool,
    /// Whether a boost warning should be shown now.
    pub warn: bool,
}

#[derive(Debug, Clone)]
pub struct VolumeControl {
    percent: u16,
    muted: bool,
    last_boost_warning: Option<Instant>,
}

impl VolumeControl {
    pub fn new(percent: u16) -> Self {
        Self {
            percent: percent.min(MAX_VOLUME_PERCENT),
            muted: false,
            last_boost_warning: None,
        }
    }

    /// Store a new volume (clamped to `0..=200`). Un-mutes.
    pub fn set_percent(&mut self, percent: u16, now: Instant) -> VolumeChange {
        self.percent = percent.min(MAX_VOLUME_PERCENT);
        self.muted = false;

        let boosted = self.is_boosted();
        let warn = boosted
            && self
                .last_boost_warning
                .is_none_or(|last| now.saturating_duration_since(last) >= BOOST_WARNING_INTERVAL);
        if warn {
            self.last_boost_warning = Some(now);
        }

        VolumeChange {
            gain: self.gain(),
            boosted,
            warn,
        }
    }

    /// Flip mute. Returns the gain the backend should now use.
    pub fn toggle_mute(&mut self) -> f32 {
        self.muted = !self.muted;
        self.effective_gain()
    }

    pub fn percent(&self) -> u16 {
        self.percent
    }

    /// Stored linear gain, ignoring mute.
    pub fn gain(&self) -> f32 {
        self.percent as f32 / 100.0
    }

    pub fn effective_gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.gain() }
    }

    pub fn is_boosted(&self) -> bool {
        self.percent > 100
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}
