use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;

use super::resources::ResourceHandle;

/// Process-unique track identifier: a base-36 millisecond timestamp followed
/// by a random base-36 suffix. Collisions are improbable, not impossible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let suffix: u64 = rand::rng().random();
        Self(format!("{}{}", to_base36(millis), to_base36(suffix)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Raw tag text; empty when absent.
    pub year: String,
    /// Raw tag text (e.g. `"3"` or `"3/12"`); empty when absent.
    pub track_number: String,
    pub genre: String,
    /// `Duration::ZERO` until something reports the real length.
    pub duration: Duration,
    pub artwork: Option<ResourceHandle>,
    pub source: ResourceHandle,
    pub path: PathBuf,
    pub file_name: String,
}

impl Track {
    pub fn has_duration(&self) -> bool {
        !self.duration.is_zero()
    }

    /// Leading decimal digits of the track number tag. Zero counts as absent.
    pub fn parsed_track_number(&self) -> Option<u32> {
        let digits: String = self
            .track_number
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse::<u32>().ok().filter(|&n| n > 0)
    }

    /// Case-insensitive substring match on title, artist or album.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.title.to_lowercase().contains(query_lower)
            || self.artist.to_lowercase().contains(query_lower)
            || self.album.to_lowercase().contains(query_lower)
    }
}

/// Tracks grouped by album name.
#[derive(Debug, Clone)]
pub struct Album {
    pub name: String,
    /// Artist of the first track seen with this album name.
    pub artist: String,
    pub year: String,
    pub artwork: Option<ResourceHandle>,
    /// Ordered by track number, unnumbered tracks last.
    pub tracks: Vec<Track>,
}

/// Tracks grouped by artist name.
#[derive(Debug, Clone)]
pub struct Artist {
    pub name: String,
    /// Distinct album names in first-seen order.
    pub album_names: Vec<String>,
    /// Import order.
    pub tracks: Vec<Track>,
    pub artwork: Option<ResourceHandle>,
}
