//! Log setup. The terminal belongs to the UI, so everything goes to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogSettings, state_dir};

const LOG_ENV: &str = "LUXE_LOG";

/// `LUXE_LOG` when set and valid, else the configured level, else `info`.
pub fn filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings
        .file
        .clone()
        .or_else(|| state_dir().map(|d| d.join("luxe.log")))
}

/// Install the global subscriber. Returns the log file path when logging
/// is active; an unopenable file leaves logging off.
pub fn init(settings: &LogSettings) -> Option<PathBuf> {
    let path = log_path(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::registry()
        .with(filter(settings))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .ok()?;
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EnvGuard, env_lock};
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn configured_file_wins_over_state_dir() {
        let settings = LogSettings {
            level: "debug".into(),
            file: Some(PathBuf::from("/tmp/custom.log")),
        };
        assert_eq!(log_path(&settings), Some(PathBuf::from("/tmp/custom.log")));
    }

    #[test]
    fn default_log_lives_in_state_dir() {
        let _lock = env_lock();
        let _g = EnvGuard::set("XDG_STATE_HOME", "/tmp/state");
        assert_eq!(
            log_path(&LogSettings::default()),
            Some(PathBuf::from("/tmp/state/luxe/luxe.log"))
        );
    }

    #[test]
    fn env_filter_overrides_level() {
        let _lock = env_lock();
        let _g = EnvGuard::set(LOG_ENV, "warn");
        let settings = LogSettings {
            level: "trace".into(),
            file: None,
        };
        assert_eq!(filter(&settings).max_level_hint(), Some(LevelFilter::WARN));
    }
}
