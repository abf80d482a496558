use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::player::{LoadId, MediaBackend, PlaybackError};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo, SourceEvent};

/// Front end of the audio thread: commands in, events out.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<SourceEvent>,
    playback: PlaybackHandle,
    loads: u64,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events) = mpsc::channel::<SourceEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, events_tx, playback_info.clone());

        Self {
            tx,
            events,
            playback: playback_info,
            loads: 0,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Events reported by the audio thread since the last call.
    pub fn drain_events(&self) -> Vec<SourceEvent> {
        self.events.try_iter().collect()
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }

    fn command(&self, cmd: AudioCmd) -> Result<(), PlaybackError> {
        self.send(cmd).map_err(|_| PlaybackError::BackendGone)
    }
}

impl MediaBackend for AudioPlayer {
    fn load(&mut self, path: &Path) -> Result<LoadId, PlaybackError> {
        self.loads += 1;
        let load = LoadId(self.loads);
        self.command(AudioCmd::Load(load, path.to_path_buf()))?;
        Ok(load)
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.command(AudioCmd::Play)
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        self.command(AudioCmd::Pause)
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        self.command(AudioCmd::SeekTo(position))
    }

    fn set_gain(&mut self, gain: f32) -> Result<(), PlaybackError> {
        self.command(AudioCmd::SetGain(gain))
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        self.command(AudioCmd::Stop)
    }

    fn elapsed(&self) -> Duration {
        self.playback
            .lock()
            .map(|info| info.elapsed)
            .unwrap_or(Duration::ZERO)
    }
}
