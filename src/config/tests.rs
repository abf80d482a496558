use super::load::{default_config_path, resolve_config_path, state_dir};
use super::schema::*;
use crate::test_support::{EnvGuard, env_lock};

#[test]
fn resolve_config_path_prefers_luxe_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LUXE_CONFIG_PATH", "/tmp/luxe-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/luxe-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("luxe")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("luxe")
            .join("config.toml")
    );
}

#[test]
fn state_dir_falls_back_to_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/luxe")
    );
}

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.import.extensions, vec!["mp3".to_string()]);
    assert_eq!(s.import.probe_timeout_ms, 3000);
    assert_eq!(s.import.unknown_artist, "Unknown Artist");
    assert_eq!(s.import.unknown_album, "Unknown Album");
    assert_eq!(s.audio.initial_volume, 100);
    assert!(matches!(s.playback.repeat, RepeatSetting::None));
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.import.probe_timeout_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = 201;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat = "repeat-one"

[audio]
initial_volume = 150
quit_fade_out_ms = 0

[controls]
scrub_seconds = 9
volume_step = 5

[ui]
header_text = "hello"
notice_ttl_ms = 1500

[import]
extensions = ["mp3", "flac"]
recursive = false
include_hidden = true
follow_links = false
probe_timeout_ms = 500
unknown_artist = "Artista Desconocido"
unknown_album = "Album Desconocido"

[log]
level = "debug"
file = "/tmp/luxe.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LUXE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("LUXE__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(matches!(s.playback.repeat, RepeatSetting::One));
    assert_eq!(s.audio.initial_volume, 150);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 5);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.notice_ttl_ms, 1500);
    assert_eq!(
        s.import.extensions,
        vec!["mp3".to_string(), "flac".to_string()]
    );
    assert!(!s.import.recursive);
    assert!(s.import.include_hidden);
    assert!(!s.import.follow_links);
    assert_eq!(s.import.probe_timeout_ms, 500);
    assert_eq!(s.import.unknown_artist, "Artista Desconocido");
    assert_eq!(s.import.unknown_album, "Album Desconocido");
    assert_eq!(s.log.level, "debug");
    assert_eq!(s.log.file, Some(std::path::PathBuf::from("/tmp/luxe.log")));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LUXE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("LUXE__AUDIO__INITIAL_VOLUME", "120");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 120);
}
