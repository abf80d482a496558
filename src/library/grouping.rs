//! Derive album and artist groupings from the flat track list.

use std::collections::HashMap;

use super::model::{Album, Artist, Track};

/// Build albums and artists from `tracks`, both in first-seen order.
///
/// Albums are keyed by name only, so same-named albums by different
/// artists end up in one bucket.
pub fn group(tracks: &[Track]) -> (Vec<Album>, Vec<Artist>) {
    let mut albums: Vec<Album> = Vec::new();
    let mut album_pos: HashMap<&str, usize> = HashMap::new();
    let mut artists: Vec<Artist> = Vec::new();
    let mut artist_pos: HashMap<&str, usize> = HashMap::new();

    for track in tracks {
        let a = *album_pos.entry(track.album.as_str()).or_insert_with(|| {
            albums.push(Album {
                name: track.album.clone(),
                artist: track.artist.clone(),
                year: track.year.clone(),
                artwork: track.artwork,
                tracks: Vec::new(),
            });
            albums.len() - 1
        });
        let album = &mut albums[a];
        if album.artwork.is_none() {
            album.artwork = track.artwork;
        }
        album.tracks.push(track.clone());

        let r = *artist_pos.entry(track.artist.as_str()).or_insert_with(|| {
            artists.push(Artist {
                name: track.artist.clone(),
                album_names: Vec::new(),
                tracks: Vec::new(),
                artwork: track.artwork,
            });
            artists.len() - 1
        });
        let artist = &mut artists[r];
        if artist.artwork.is_none() {
            artist.artwork = track.artwork;
        }
        if !artist.album_names.iter().any(|n| n == &track.album) {
            artist.album_names.push(track.album.clone());
        }
        artist.tracks.push(track.clone());
    }

    for album in &mut albums {
        sort_album_tracks(&mut album.tracks);
    }

    (albums, artists)
}

/// Stable sort by parsed track number; unnumbered tracks go last.
pub fn sort_album_tracks(tracks: &mut [Track]) {
    tracks.sort_by_key(|t| match t.parsed_track_number() {
        Some(n) => (false, n),
        None => (true, 0),
    });
}
