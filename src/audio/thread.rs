use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use super::sink::create_sink_at;
use crate::player::LoadId;

use super::types::{AudioCmd, AudioError, AudioEvent, PlaybackHandle, SourceEvent};

/// A source that stops this early while claiming to be much longer did not
/// play to its end.
const EARLY_END: Duration = Duration::from_secs(1);

/// Decide what an emptied sink means: a normal end, or a runtime failure.
pub(super) fn classify_end(elapsed: Duration, total: Option<Duration>) -> AudioEvent {
    match total {
        Some(total) if total > EARLY_END * 2 && elapsed < EARLY_END => {
            AudioEvent::Error(format!(
                "playback stopped after {:.1}s of {:.0}s",
                elapsed.as_secs_f32(),
                total.as_secs_f32()
            ))
        }
        _ => AudioEvent::Ended,
    }
}

struct Bound {
    path: PathBuf,
    sink: Sink,
    total: Option<Duration>,
    /// Start position of a sink rebuilt mid-track; `get_pos` counts from here.
    offset: Duration,
}

impl Bound {
    fn position(&self) -> Duration {
        self.offset + self.sink.get_pos()
    }
}

struct AudioThread {
    stream: Option<OutputStream>,
    events: Sender<SourceEvent>,
    /// Load the bound source (or the failed attempt) belongs to.
    load: LoadId,
    playback_info: PlaybackHandle,
    bound: Option<Bound>,
    playing: bool,
    gain: f32,
}

impl AudioThread {
    fn emit(&self, event: AudioEvent) {
        let _ = self.events.send(SourceEvent {
            load: self.load,
            event,
        });
    }

    fn publish(&self) {
        let elapsed = self
            .bound
            .as_ref()
            .map(Bound::position)
            .unwrap_or(Duration::ZERO);
        if let Ok(mut info) = self.playback_info.lock() {
            info.elapsed = elapsed;
            info.playing = self.playing;
        }
    }

    fn open(&self, path: &Path, start_at: Duration) -> Result<Bound, AudioError> {
        let Some(stream) = self.stream.as_ref() else {
            return Err(AudioError::NoDevice("output stream unavailable".to_string()));
        };
        let (sink, total) = create_sink_at(stream, path, start_at, self.gain)?;
        Ok(Bound {
            path: path.to_path_buf(),
            sink,
            total,
            offset: start_at,
        })
    }

    fn load(&mut self, load: LoadId, path: PathBuf) {
        if let Some(old) = self.bound.take() {
            old.sink.stop();
        }
        self.playing = false;
        self.load = load;

        match self.open(&path, Duration::ZERO) {
            Ok(bound) => {
                debug!(path = %path.display(), "source bound");
                if let Some(total) = bound.total {
                    self.emit(AudioEvent::DurationKnown(total));
                }
                self.bound = Some(bound);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to bind source");
                self.emit(AudioEvent::StartFailed(e.to_string()));
            }
        }
    }

    fn play(&mut self) {
        // A failed load was already reported; nothing to start.
        let Some(bound) = self.bound.as_ref() else {
            return;
        };
        bound.sink.play();
        self.playing = true;
        self.emit(AudioEvent::Started);
    }

    fn pause(&mut self) {
        if let Some(bound) = self.bound.as_ref() {
            bound.sink.pause();
        }
        self.playing = false;
    }

    fn seek_to(&mut self, pos: Duration) {
        let Some(bound) = self.bound.as_mut() else {
            return;
        };

        // An exhausted sink cannot seek; rebuild it from the file instead.
        if !bound.sink.empty() {
            match bound.sink.try_seek(pos) {
                Ok(()) => {
                    bound.offset = Duration::ZERO;
                    return;
                }
                Err(e) => debug!(error = %e, "in-place seek failed, rebuilding sink"),
            }
        }

        let path = bound.path.clone();
        match self.open(&path, pos) {
            Ok(fresh) => {
                if let Some(old) = self.bound.replace(fresh) {
                    old.sink.stop();
                }
                if self.playing {
                    if let Some(b) = self.bound.as_ref() {
                        b.sink.play();
                    }
                }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to rebuild sink for seek");
                self.emit(AudioEvent::Error(e.to_string()));
            }
        }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(bound) = self.bound.as_ref() {
            bound.sink.set_volume(gain);
        }
    }

    fn stop(&mut self) {
        if let Some(old) = self.bound.take() {
            old.sink.stop();
        }
        self.playing = false;
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(bound) = self.bound.as_ref() else {
            return;
        };
        if fade_out_ms == 0 || !self.playing {
            bound.sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            bound.sink.set_volume(self.gain * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        bound.sink.set_volume(0.0);
    }

    /// Report a sink that ran dry while we believed it was playing.
    fn check_finished(&mut self) {
        if !self.playing {
            return;
        }
        let Some(bound) = self.bound.as_ref() else {
            return;
        };
        if !bound.sink.empty() {
            return;
        }
        let event = classify_end(bound.position(), bound.total);
        self.playing = false;
        self.emit(event);
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<SourceEvent>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!(error = %e, "no audio output device");
                None
            }
        };

        let mut audio = AudioThread {
            stream,
            events,
            load: LoadId(0),
            playback_info,
            bound: None,
            playing: false,
            gain: 1.0,
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(load, path) => audio.load(load, path),
                    AudioCmd::Play => audio.play(),
                    AudioCmd::Pause => audio.pause(),
                    AudioCmd::SeekTo(pos) => audio.seek_to(pos),
                    AudioCmd::SetGain(gain) => audio.set_gain(gain),
                    AudioCmd::Stop => audio.stop(),
                    AudioCmd::Quit { fade_out_ms } => {
                        audio.fade_out(fade_out_ms);
                        audio.stop();
                        audio.publish();
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => audio.check_finished(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
            audio.publish();
        }
    })
}
