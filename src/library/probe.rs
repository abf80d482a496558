//! Duration probing of playable sources.
//!
//! A probe opens its own decoder, asks it for the total length and drops it
//! again. It never touches the sink used for playback.
//!
//! A probe that outlives its timeout is detached, not cancelled: its thread
//! keeps the file open until `probe` returns and then drops everything. The
//! decoder probe only reads container headers, so that tail is short.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use rodio::{Decoder, Source};
use tracing::debug;

use super::error::ImportError;

pub trait DurationProbe: Send + Sync {
    /// Total duration if the decoder knows it.
    fn probe(&self, path: &Path) -> Result<Option<Duration>, ImportError>;
}

/// Probe backed by the same decoder used for playback.
///
/// Opening from a `File` hands the byte length to the decoder, which needs
/// it to estimate the length of constant-bitrate streams without a header.
pub struct DecoderProbe;

impl DurationProbe for DecoderProbe {
    fn probe(&self, path: &Path) -> Result<Option<Duration>, ImportError> {
        let err = |reason: String| ImportError::Probe {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|e| err(e.to_string()))?;
        let decoder = Decoder::try_from(file).map_err(|e| err(e.to_string()))?;
        Ok(decoder.total_duration())
    }
}

/// A probe that has been started on its own thread.
pub struct PendingProbe {
    rx: mpsc::Receiver<Duration>,
    started: Instant,
}

impl PendingProbe {
    pub fn spawn(probe: Arc<dyn DurationProbe>, path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        thread::spawn(move || {
            let duration = match probe.probe(&path) {
                Ok(Some(d)) => d,
                Ok(None) => {
                    debug!(path = %path.display(), "decoder reports no duration");
                    Duration::ZERO
                }
                Err(e) => {
                    debug!(error = %e, "duration probe failed");
                    Duration::ZERO
                }
            };
            // The importer may have stopped waiting already.
            let _ = tx.send(duration);
        });
        Self { rx, started }
    }

    /// Wait until `timeout` after the probe was spawned. Timeouts yield
    /// `Duration::ZERO`.
    pub fn wait(self, timeout: Duration) -> Duration {
        let left = timeout.saturating_sub(self.started.elapsed());
        match self.rx.recv_timeout(left) {
            Ok(d) => d,
            Err(_) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "duration probe timed out");
                Duration::ZERO
            }
        }
    }
}
