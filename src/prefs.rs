//! Persisted user preferences. Currently only the color theme.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::state_dir;

const PREFS_PATH_ENV: &str = "LUXE_PREFS_PATH";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Luxury,
    Dark,
    Blue,
    Purple,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Luxury, Theme::Dark, Theme::Blue, Theme::Purple];

    pub fn display_name(self) -> &'static str {
        match self {
            Theme::Luxury => "Luxury Gold",
            Theme::Dark => "Jet Black",
            Theme::Blue => "Ocean Blue",
            Theme::Purple => "Royal Purple",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Theme::Luxury => "luxury",
            Theme::Dark => "dark",
            Theme::Blue => "blue",
            Theme::Purple => "purple",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key.trim())
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("no location for the preferences file")]
    NoLocation,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// On-disk shape. The theme stays a string so unknown names can fall back.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    theme: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: Option<PathBuf>,
}

impl PrefsStore {
    /// `$LUXE_PREFS_PATH`, else `prefs.toml` in the state directory.
    pub fn from_env() -> Self {
        let path = std::env::var_os(PREFS_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| state_dir().map(|d| d.join("prefs.toml")));
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load_theme(&self) -> Theme {
        let Some(path) = self.path.as_deref() else {
            return Theme::default();
        };
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no saved preferences");
                return Theme::default();
            }
        };
        let file: PrefsFile = match toml::from_str(&raw) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable preferences file");
                return Theme::default();
            }
        };
        file.theme
            .as_deref()
            .and_then(Theme::from_key)
            .unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) -> Result<(), PrefsError> {
        let path = self.path.as_deref().ok_or(PrefsError::NoLocation)?;
        let body = toml::to_string(&PrefsFile {
            theme: Some(theme.key().to_string()),
        })?;
        let write_err = |source| PrefsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, body).map_err(write_err)?;
        debug!(theme = theme.key(), "theme saved");
        Ok(())
    }
}
