use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::library::{ImportedFile, LibraryStore};
use crate::notify::{Notice, Notifier};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Seek(Duration),
    Gain(f32),
    Stop,
}

#[derive(Default)]
struct FakeBackend {
    calls: Vec<Call>,
    elapsed: Duration,
}

impl MediaBackend for FakeBackend {
    fn load(&mut self, path: &Path) -> Result<LoadId, PlaybackError> {
        self.calls.push(Call::Load(path.to_path_buf()));
        let loads = self
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .count();
        Ok(LoadId(loads as u64))
    }
    fn play(&mut self) -> Result<(), PlaybackError> {
        self.calls.push(Call::Play);
        Ok(())
    }
    fn pause(&mut self) -> Result<(), PlaybackError> {
        self.calls.push(Call::Pause);
        Ok(())
    }
    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        self.calls.push(Call::Seek(position));
        Ok(())
    }
    fn set_gain(&mut self, gain: f32) -> Result<(), PlaybackError> {
        self.calls.push(Call::Gain(gain));
        Ok(())
    }
    fn stop(&mut self) -> Result<(), PlaybackError> {
        self.calls.push(Call::Stop);
        Ok(())
    }
    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

fn imported(title: &str, secs: u64) -> ImportedFile {
    ImportedFile {
        path: PathBuf::from(format!("/music/{title}.mp3")),
        file_name: format!("{title}.mp3"),
        title: title.into(),
        artist: "Artist".into(),
        album: "Album".into(),
        year: String::new(),
        track_number: String::new(),
        genre: String::new(),
        artwork: None,
        duration: Duration::from_secs(secs),
    }
}

fn library(n: usize) -> LibraryStore {
    let mut lib = LibraryStore::new();
    lib.add_imported((0..n).map(|i| imported(&format!("t{i}"), 200)).collect());
    lib
}

fn controller() -> (PlaybackController<FakeBackend>, Receiver<Notice>) {
    let (notifier, rx) = Notifier::channel();
    let ctl = PlaybackController::new(FakeBackend::default(), notifier, 100)
        .with_rng(StdRng::seed_from_u64(7));
    (ctl, rx)
}

fn messages(rx: &Receiver<Notice>) -> Vec<Notice> {
    rx.try_iter().filter(|n| *n != Notice::Changed).collect()
}

#[test]
fn next_wraps_around() {
    let lib = library(3);
    let (mut ctl, _rx) = controller();

    ctl.play_track_at(&lib, 0).unwrap();
    let mut seen = Vec::new();
    for _ in 0..4 {
        ctl.next(&lib).unwrap();
        seen.push(ctl.current_index());
    }
    assert_eq!(seen, vec![1, 2, 0, 1]);
    assert_eq!(ctl.status(), PlayerStatus::Playing);
}

#[test]
fn previous_from_first_goes_to_last() {
    let lib = library(4);
    let (mut ctl, _rx) = controller();

    ctl.play_track_at(&lib, 0).unwrap();
    ctl.previous(&lib).unwrap();
    assert_eq!(ctl.current_index(), 3);
    assert_eq!(ctl.current_track_id(), Some(&lib.tracks()[3].id));
}

#[test]
fn navigation_on_empty_library_is_a_no_op() {
    let lib = LibraryStore::new();
    let (mut ctl, _rx) = controller();

    ctl.next(&lib).unwrap();
    ctl.previous(&lib).unwrap();
    ctl.toggle_play_pause(&lib).unwrap();
    assert_eq!(ctl.status(), PlayerStatus::Empty);
    assert!(ctl.backend().calls.is_empty());
}

#[test]
fn shuffled_next_stays_in_range() {
    let lib = library(5);
    let (mut ctl, _rx) = controller();
    ctl.set_shuffle(true);

    for _ in 0..50 {
        ctl.next(&lib).unwrap();
        assert!(ctl.current_index() < 5);
    }
}

#[test]
fn play_loads_the_track_source() {
    let lib = library(2);
    let (mut ctl, _rx) = controller();

    ctl.play_track_at(&lib, 1).unwrap();
    assert_eq!(
        ctl.backend().calls,
        vec![Call::Load(PathBuf::from("/music/t1.mp3")), Call::Play]
    );
    assert!(ctl.state().is_playing());
}

#[test]
fn play_out_of_range_is_rejected() {
    let lib = library(2);
    let (mut ctl, _rx) = controller();

    let err = ctl.play_track_at(&lib, 9).unwrap_err();
    assert!(matches!(err, PlaybackError::IndexOutOfRange(9)));
    assert_eq!(ctl.status(), PlayerStatus::Empty);
}

#[test]
fn toggle_play_pause_cycles() {
    let lib = library(2);
    let (mut ctl, _rx) = controller();

    ctl.toggle_play_pause(&lib).unwrap();
    assert_eq!(ctl.status(), PlayerStatus::Playing);
    assert_eq!(ctl.current_index(), 0);

    ctl.toggle_play_pause(&lib).unwrap();
    assert_eq!(ctl.status(), PlayerStatus::Paused);

    ctl.toggle_play_pause(&lib).unwrap();
    assert_eq!(ctl.status(), PlayerStatus::Playing);
}

#[test]
fn volume_boost_flag_follows_percent() {
    let (mut ctl, rx) = controller();
    let now = Instant::now();

    ctl.set_volume_at(150, now).unwrap();
    assert!(ctl.volume().is_boosted());
    assert_eq!(ctl.backend().calls.last(), Some(&Call::Gain(1.5)));

    ctl.set_volume_at(50, now + Duration::from_secs(5)).unwrap();
    assert!(!ctl.volume().is_boosted());
    assert_eq!(ctl.backend().calls.last(), Some(&Call::Gain(0.5)));

    assert_eq!(
        messages(&rx),
        vec![Notice::Warning("Volume boosted: 150%".into())]
    );
}

#[test]
fn boost_warning_is_throttled() {
    let (mut ctl, rx) = controller();
    let t0 = Instant::now();

    ctl.set_volume_at(150, t0).unwrap();
    ctl.set_volume_at(160, t0 + Duration::from_secs(1)).unwrap();
    ctl.set_volume_at(170, t0 + Duration::from_secs(3)).unwrap();

    let warnings = messages(&rx);
    assert_eq!(
        warnings,
        vec![
            Notice::Warning("Volume boosted: 150%".into()),
            Notice::Warning("Volume boosted: 170%".into()),
        ]
    );
}

#[test]
fn volume_is_clamped() {
    let (mut ctl, _rx) = controller();
    ctl.set_volume(500).unwrap();
    assert_eq!(ctl.volume().percent(), MAX_VOLUME_PERCENT);
}

#[test]
fn mute_keeps_stored_volume() {
    let (mut ctl, _rx) = controller();
    ctl.set_volume(80).unwrap();

    ctl.toggle_mute().unwrap();
    assert!(ctl.volume().is_muted());
    assert_eq!(ctl.volume().percent(), 80);
    assert_eq!(ctl.backend().calls.last(), Some(&Call::Gain(0.0)));

    ctl.toggle_mute().unwrap();
    assert_eq!(ctl.backend().calls.last(), Some(&Call::Gain(0.8)));
}

#[test]
fn repeat_one_replays_current_track() {
    let lib = library(5);
    let (mut ctl, _rx) = controller();
    ctl.play_track_at(&lib, 2).unwrap();
    ctl.set_repeat(RepeatMode::One);

    ctl.on_track_ended(&lib).unwrap();
    assert_eq!(ctl.current_index(), 2);
    assert_eq!(ctl.status(), PlayerStatus::Playing);
    let tail = &ctl.backend().calls[ctl.backend().calls.len() - 2..];
    assert_eq!(tail, &[Call::Seek(Duration::ZERO), Call::Play]);
}

#[test]
fn repeat_none_pauses_after_last_track() {
    let lib = library(3);
    let (mut ctl, _rx) = controller();
    ctl.play_track_at(&lib, 2).unwrap();

    ctl.on_track_ended(&lib).unwrap();
    assert_eq!(ctl.status(), PlayerStatus::Paused);
    assert_eq!(ctl.current_index(), 2);
    assert_eq!(ctl.backend().calls.last(), Some(&Call::Pause));
}

#[test]
fn repeat_none_advances_before_last_track() {
    let lib = library(3);
    let (mut ctl, _rx) = controller();
    ctl.play_track_at(&lib, 0).unwrap();

    ctl.on_track_ended(&lib).unwrap();
    assert_eq!(ctl.current_index(), 1);
}

#[test]
fn repeat_all_wraps_after_last_track() {
    let lib = library(3);
    let (mut ctl, _rx) = controller();
    ctl.play_track_at(&lib, 2).unwrap();
    ctl.set_repeat(RepeatMode::All);

    ctl.on_track_ended(&lib).unwrap();
    assert_eq!(ctl.current_index(), 0);
    assert_eq!(ctl.status(), PlayerStatus::Playing);
}

#[test]
fn cycle_repeat_announces_mode() {
    let (mut ctl, rx) = controller();
    ctl.cycle_repeat();
    ctl.cycle_repeat();
    ctl.cycle_repeat();
    assert_eq!(ctl.state().repeat, RepeatMode::None);
    assert_eq!(
        messages(&rx),
        vec![
            Notice::Info("Repeat all".into()),
            Notice::Info("Repeat one".into()),
            Notice::Info("Repeat off".into()),
        ]
    );
}

#[test]
fn seek_scales_fraction_by_duration() {
    let lib = library(1);
    let (mut ctl, _rx) = controller();
    ctl.play_track_at(&lib, 0).unwrap();

    ctl.seek(&lib, 0.5).unwrap();
    ctl.seek(&lib, 3.0).unwrap();
    let calls = &ctl.backend().calls;
    assert_eq!(calls[calls.len() - 2], Call::Seek(Duration::from_secs(100)));
    assert_eq!(calls[calls.len() - 1], Call::Seek(Duration::from_secs(200)));
}

#[test]
fn seek_without_duration_is_a_no_op() {
    let mut lib = LibraryStore::new();
    lib.add_imported(vec![imported("silent", 0)]);
    let (mut ctl, _rx) = controller();

    ctl.seek(&lib, 0.5).unwrap();
    assert!(ctl.backend().calls.is_empty());

    ctl.play_track_at(&lib, 0).unwrap();
    let before = ctl.backend().calls.len();
    ctl.seek(&lib, 0.5).unwrap();
    ctl.seek_by(&lib, 5).unwrap();
    assert_eq!(ctl.backend().calls.len(), before);
}

#[test]
fn seek_by_clamps_to_track_bounds() {
    let lib = library(1);
    let (mut ctl, _rx) = controller();
    ctl.play_track_at(&lib, 0).unwrap();

    ctl.seek_by(&lib, -5).unwrap();
    assert_eq!(ctl.backend().calls.last(), Some(&Call::Seek(Duration::ZERO)));

    ctl.seek_by(&lib, 500).unwrap();
    assert_eq!(
        ctl.backend().calls.last(),
        Some(&Call::Seek(Duration::from_secs(200)))
    );
}

#[test]
fn start_failure_reports_without_changing_state() {
    let lib = library(2);
    let (mut ctl, rx) = controller();
    ctl.play_track_at(&lib, 1).unwrap();
    let before = ctl.state().clone();

    ctl.on_start_failed("unsupported format");
    assert_eq!(ctl.status(), before.status);
    assert_eq!(ctl.current_index(), 1);
    assert!(
        messages(&rx)
            .iter()
            .any(|n| matches!(n, Notice::Error(_)))
    );
}

#[test]
fn playback_error_skips_ahead() {
    let lib = library(3);
    let (mut ctl, rx) = controller();
    ctl.play_track_at(&lib, 0).unwrap();

    ctl.on_playback_error(&lib, "decoder died").unwrap();
    assert_eq!(ctl.current_index(), 1);
    assert!(matches!(messages(&rx).as_slice(), [Notice::Error(_)]));
}

#[test]
fn revoked_source_cannot_play() {
    let mut lib = library(2);
    let id = lib.tracks()[0].id.clone();
    let removed = lib.remove_track(&id).unwrap();
    // Re-add the track struct without re-registering its source.
    lib.add_tracks(vec![removed]);
    let (mut ctl, _rx) = controller();

    let err = ctl.play_track_at(&lib, 1).unwrap_err();
    assert!(matches!(err, PlaybackError::SourceRevoked(ref got) if *got == id));
}

#[test]
fn forgetting_current_track_stops_playback() {
    let mut lib = library(3);
    let (mut ctl, _rx) = controller();
    ctl.play_track_at(&lib, 1).unwrap();

    let id = lib.tracks()[1].id.clone();
    lib.remove_track(&id);
    ctl.forget_track(&lib, &id).unwrap();
    assert_eq!(ctl.status(), PlayerStatus::Empty);
    assert_eq!(ctl.current_track_id(), None);
    assert_eq!(ctl.backend().calls.last(), Some(&Call::Stop));
}

#[test]
fn forgetting_other_track_reindexes_current() {
    let mut lib = library(3);
    let (mut ctl, _rx) = controller();
    ctl.play_track_at(&lib, 2).unwrap();

    let first = lib.tracks()[0].id.clone();
    lib.remove_track(&first);
    ctl.forget_track(&lib, &first).unwrap();
    assert_eq!(ctl.current_index(), 1);
    assert_eq!(ctl.status(), PlayerStatus::Playing);
}

#[test]
fn each_load_replaces_the_current_source() {
    let lib = library(3);
    let (mut ctl, _rx) = controller();
    assert_eq!(ctl.loaded(), None);

    ctl.play_track_at(&lib, 0).unwrap();
    let first = ctl.loaded().unwrap();
    assert!(ctl.is_current(first));

    ctl.next(&lib).unwrap();
    assert!(!ctl.is_current(first));
    assert!(ctl.loaded().is_some_and(|l| l != first));

    // Pausing and resuming keep the same source bound.
    let second = ctl.loaded().unwrap();
    ctl.toggle_play_pause(&lib).unwrap();
    ctl.toggle_play_pause(&lib).unwrap();
    assert!(ctl.is_current(second));

    let current = ctl.current_track_id().cloned().unwrap();
    ctl.forget_track(&lib, &current).unwrap();
    assert_eq!(ctl.loaded(), None);
}
