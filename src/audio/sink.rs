//! Utilities for creating `rodio` sinks from audio files.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::AudioError;

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Also returns the decoder's total duration when it knows it.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    gain: f32,
) -> Result<(Sink, Option<Duration>), AudioError> {
    // From a `File` the decoder learns the byte length, which it needs to
    // size constant-bitrate MP3s that carry no Xing/Info header.
    let decoder = Decoder::try_from(File::open(path)?)?;
    let total = decoder.total_duration();

    // `skip_duration` is our fallback seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(gain);
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
