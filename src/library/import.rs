//! Batch import: tag extraction plus duration probing for each file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use lofty::tag::ItemKey;
use tracing::{debug, info, warn};

use crate::config::ImportSettings;

use super::error::ImportError;
use super::probe::{DecoderProbe, DurationProbe, PendingProbe};
use super::scan::collect_candidates;

/// Upper bound on files processed at the same time within one batch.
const MAX_IN_FLIGHT: usize = 16;

/// Embedded cover art as found in the tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub mime: String,
    pub data: Vec<u8>,
}

/// Tag fields the library cares about. Blank values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    /// Length from the stream properties, when the reader could tell.
    pub duration: Option<Duration>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub track_number: Option<String>,
    pub genre: Option<String>,
    pub picture: Option<Picture>,
}

pub trait TagReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<TrackTags, ImportError>;
}

/// Reads ID3/Vorbis/etc. tags through lofty.
pub struct LoftyTagReader;

fn non_blank(v: impl AsRef<str>) -> Option<String> {
    let v = v.as_ref().trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

impl TagReader for LoftyTagReader {
    fn read(&self, path: &Path) -> Result<TrackTags, ImportError> {
        let tagged = lofty::read_from_path(path).map_err(|e| ImportError::Tags {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            debug!(path = %path.display(), "file carries no tags");
            return Ok(TrackTags {
                duration,
                ..TrackTags::default()
            });
        };

        let year = tag
            .get_string(ItemKey::Year)
            .or_else(|| tag.get_string(ItemKey::RecordingDate))
            .and_then(non_blank);

        let picture = tag.pictures().first().map(|p| Picture {
            mime: p
                .mime_type()
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "image/jpeg".to_string()),
            data: p.data().to_vec(),
        });

        Ok(TrackTags {
            duration,
            title: tag.title().and_then(non_blank),
            artist: tag.artist().and_then(non_blank),
            album: tag.album().and_then(non_blank),
            year,
            track_number: tag
                .get_string(ItemKey::TrackNumber)
                .and_then(non_blank)
                .or_else(|| tag.track().map(|n| n.to_string())),
            genre: tag.genre().and_then(non_blank),
            picture,
        })
    }
}

/// One file's import result, before it is registered in the library.
#[derive(Debug, Clone)]
pub struct ImportedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub track_number: String,
    pub genre: String,
    pub artwork: Option<Picture>,
    pub duration: Duration,
}

pub struct Importer {
    settings: ImportSettings,
    tags: Arc<dyn TagReader>,
    probe: Arc<dyn DurationProbe>,
}

impl Importer {
    pub fn new(settings: ImportSettings) -> Self {
        Self::with_backends(settings, Arc::new(LoftyTagReader), Arc::new(DecoderProbe))
    }

    pub fn with_backends(
        settings: ImportSettings,
        tags: Arc<dyn TagReader>,
        probe: Arc<dyn DurationProbe>,
    ) -> Self {
        Self {
            settings,
            tags,
            probe,
        }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Files from `inputs` that this importer would accept.
    pub fn candidates(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        collect_candidates(inputs, &self.settings)
    }

    /// Import every supported file reachable from `inputs`.
    ///
    /// Returns only once every accepted file has been tagged and probed.
    /// Per-file failures degrade that file to placeholder fields; only an
    /// empty selection is an error.
    pub fn import_batch(&self, inputs: &[PathBuf]) -> Result<Vec<ImportedFile>, ImportError> {
        let files = self.candidates(inputs);
        if files.is_empty() {
            return Err(ImportError::NoValidFiles);
        }
        info!(count = files.len(), "importing batch");

        let mut out: Vec<ImportedFile> = Vec::with_capacity(files.len());
        for chunk in files.chunks(MAX_IN_FLIGHT) {
            thread::scope(|s| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|path| (path, s.spawn(move || self.import_one(path))))
                    .collect();
                for (path, handle) in handles {
                    let imported = handle.join().unwrap_or_else(|_| {
                        warn!(path = %path.display(), "import worker panicked");
                        self.build(path, None, Duration::ZERO)
                    });
                    out.push(imported);
                }
            });
        }

        info!(count = out.len(), "batch imported");
        Ok(out)
    }

    fn import_one(&self, path: &Path) -> ImportedFile {
        // Probe runs beside the tag read and is only waited on when the
        // stream properties carry no length.
        let pending = PendingProbe::spawn(self.probe.clone(), path.to_path_buf());

        let tags = match self.tags.read(path) {
            Ok(tags) => Some(tags),
            Err(e) => {
                warn!(error = %e, "falling back to file name");
                None
            }
        };

        // Stream properties are exact for most files; the decoder covers the rest.
        let duration = match tags.as_ref().and_then(|t| t.duration) {
            Some(d) => d,
            None => pending.wait(Duration::from_millis(self.settings.probe_timeout_ms)),
        };
        self.build(path, tags, duration)
    }

    fn build(&self, path: &Path, tags: Option<TrackTags>, duration: Duration) -> ImportedFile {
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let tags = tags.unwrap_or_default();
        ImportedFile {
            path: path.to_path_buf(),
            file_name,
            title: tags.title.unwrap_or(stem),
            artist: tags
                .artist
                .unwrap_or_else(|| self.settings.unknown_artist.clone()),
            album: tags
                .album
                .unwrap_or_else(|| self.settings.unknown_album.clone()),
            year: tags.year.unwrap_or_default(),
            track_number: tags.track_number.unwrap_or_default(),
            genre: tags.genre.unwrap_or_default(),
            artwork: tags.picture,
            duration,
        }
    }
}
