//! Up-next queue. Independent of the automatic next-track order.

use thiserror::Error;
use tracing::warn;

use crate::library::{LibraryStore, Track, TrackId};
use crate::notify::Notifier;
use crate::player::{MediaBackend, PlaybackController, PlaybackError};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue index out of range: {0}")]
    IndexOutOfRange(usize),

    /// The entry's track has left the library; the entry was dropped.
    #[error("track {0} is no longer in the library")]
    TrackRemoved(TrackId),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

#[derive(Debug)]
pub struct Queue {
    entries: Vec<Track>,
    notifier: Notifier,
}

impl Queue {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            entries: Vec::new(),
            notifier,
        }
    }

    /// Append a snapshot of the track with `id`. Unknown ids are ignored.
    pub fn enqueue(&mut self, library: &LibraryStore, id: &TrackId) -> bool {
        let Some(track) = library.track(id) else {
            return false;
        };
        self.entries.push(track.clone());
        self.notifier
            .success(format!("Added \"{}\" to queue", track.title));
        self.notifier.changed();
        true
    }

    /// Play queue entry `index` from its position in the library.
    pub fn select_at<B: MediaBackend>(
        &mut self,
        index: usize,
        library: &LibraryStore,
        controller: &mut PlaybackController<B>,
    ) -> Result<(), QueueError> {
        let entry = self
            .entries
            .get(index)
            .ok_or(QueueError::IndexOutOfRange(index))?;

        match library.index_of(&entry.id) {
            Some(pos) => {
                controller.play_track_at(library, pos)?;
                Ok(())
            }
            None => {
                let removed = self.entries.remove(index);
                warn!(id = %removed.id, title = %removed.title, "queued track left the library");
                self.notifier
                    .error(format!("\"{}\" is no longer in the library", removed.title));
                self.notifier.changed();
                Err(QueueError::TrackRemoved(removed.id))
            }
        }
    }

    /// Drop every entry for `id`.
    pub fn prune(&mut self, id: &TrackId) {
        let before = self.entries.len();
        self.entries.retain(|t| &t.id != id);
        if self.entries.len() != before {
            self.notifier.changed();
        }
    }

    pub fn entries(&self) -> &[Track] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
