use std::time::Duration;

use tracing::debug;

use super::grouping::group;
use super::import::ImportedFile;
use super::model::{Album, Artist, Track, TrackId};
use super::resources::ResourceRegistry;

/// The flat track list plus its album and artist groupings.
///
/// Groupings are rebuilt from scratch after every mutation, so they always
/// partition exactly the current track list.
#[derive(Debug, Default)]
pub struct LibraryStore {
    tracks: Vec<Track>,
    albums: Vec<Album>,
    artists: Vec<Artist>,
    resources: ResourceRegistry,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tracks(&mut self, batch: Vec<Track>) {
        self.tracks.extend(batch);
        self.rebuild();
    }

    /// Register resources for freshly imported files and add them as tracks.
    pub fn add_imported(&mut self, batch: Vec<ImportedFile>) -> Vec<TrackId> {
        let tracks: Vec<Track> = batch
            .into_iter()
            .map(|f| {
                let artwork = f
                    .artwork
                    .map(|p| self.resources.create_artwork(p.mime, p.data));
                let source = self.resources.create_audio(f.path.clone());
                Track {
                    id: TrackId::generate(),
                    title: f.title,
                    artist: f.artist,
                    album: f.album,
                    year: f.year,
                    track_number: f.track_number,
                    genre: f.genre,
                    duration: f.duration,
                    artwork,
                    source,
                    path: f.path,
                    file_name: f.file_name,
                }
            })
            .collect();

        let ids = tracks.iter().map(|t| t.id.clone()).collect();
        self.add_tracks(tracks);
        ids
    }

    /// Tracks whose title, artist or album contains `query`, ignoring case.
    /// A blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<&Track> {
        self.search_indices(query)
            .into_iter()
            .map(|i| &self.tracks[i])
            .collect()
    }

    /// Positions in the flat list of the tracks `search` would return.
    pub fn search_indices(&self, query: &str) -> Vec<usize> {
        if query.trim().is_empty() {
            return (0..self.tracks.len()).collect();
        }
        let q = query.to_lowercase();
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.matches(&q))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn set_duration(&mut self, id: &TrackId, duration: Duration) {
        let Some(track) = self.tracks.iter_mut().find(|t| &t.id == id) else {
            return;
        };
        if track.duration == duration {
            return;
        }
        track.duration = duration;
        self.rebuild();
    }

    /// Remove a track, revoke its resources and regroup.
    pub fn remove_track(&mut self, id: &TrackId) -> Option<Track> {
        let idx = self.index_of(id)?;
        let track = self.tracks.remove(idx);
        if let Some(art) = track.artwork {
            self.resources.revoke(art);
        }
        self.resources.revoke(track.source);
        self.rebuild();
        debug!(id = %track.id, title = %track.title, "track removed");
        Some(track)
    }

    fn rebuild(&mut self) {
        let (albums, artists) = group(&self.tracks);
        self.albums = albums;
        self.artists = artists;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn album(&self, name: &str) -> Option<&Album> {
        self.albums.iter().find(|a| a.name == name)
    }

    pub fn artist(&self, name: &str) -> Option<&Artist> {
        self.artists.iter().find(|a| a.name == name)
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }
}
