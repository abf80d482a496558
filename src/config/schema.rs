use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/luxe/config.toml` or `~/.config/luxe/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `LUXE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub import: ImportSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume at startup, in percent. Values above 100 amplify.
    pub initial_volume: u16,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 100,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long a toast stays on screen (milliseconds).
    pub notice_ttl_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " luxe audio ".to_string(),
            notice_ttl_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `[` / `]`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press, in percent.
    pub volume_step: u16,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Default repeat mode.
    pub repeat: RepeatSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: RepeatSetting::None,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatSetting {
    #[serde(alias = "off", alias = "no-repeat", alias = "no_repeat")]
    None,
    #[serde(alias = "repeat-all", alias = "repeat_all", alias = "loop-all")]
    All,
    #[serde(alias = "repeat-one", alias = "repeat_one", alias = "loop-one")]
    One,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// File extensions accepted as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when walking dropped directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Give up on a duration probe after this many milliseconds.
    pub probe_timeout_ms: u64,
    /// Artist used when tags are missing or unreadable.
    pub unknown_artist: String,
    /// Album used when tags are missing or unreadable.
    pub unknown_album: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            probe_timeout_ms: 3000,
            unknown_artist: "Unknown Artist".to_string(),
            unknown_album: "Unknown Album".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `LUXE_LOG` is not set.
    pub level: String,
    /// Log file; defaults to the XDG state directory.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
