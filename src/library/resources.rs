//! Revocable handles for artwork bytes and playable sources.
//!
//! Tracks never own raw bytes or paths directly; they hold a
//! `ResourceHandle` into the registry. Removing a track revokes its
//! handles so nothing keeps artwork alive for a track that is gone.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle(u64);

#[derive(Debug, Clone)]
pub enum Resource {
    Artwork { mime: String, bytes: Arc<[u8]> },
    Audio { path: PathBuf },
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    next: u64,
    live: HashMap<ResourceHandle, Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, resource: Resource) -> ResourceHandle {
        self.next += 1;
        let handle = ResourceHandle(self.next);
        self.live.insert(handle, resource);
        handle
    }

    pub fn create_artwork(&mut self, mime: impl Into<String>, bytes: Vec<u8>) -> ResourceHandle {
        self.insert(Resource::Artwork {
            mime: mime.into(),
            bytes: bytes.into(),
        })
    }

    pub fn create_audio(&mut self, path: impl Into<PathBuf>) -> ResourceHandle {
        self.insert(Resource::Audio { path: path.into() })
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&Resource> {
        self.live.get(&handle)
    }

    /// Path behind an audio handle, or `None` if revoked or not audio.
    pub fn audio_path(&self, handle: ResourceHandle) -> Option<&Path> {
        match self.live.get(&handle) {
            Some(Resource::Audio { path }) => Some(path),
            _ => None,
        }
    }

    /// MIME type behind an artwork handle, or `None` if revoked or not artwork.
    pub fn artwork_mime(&self, handle: ResourceHandle) -> Option<&str> {
        match self.live.get(&handle) {
            Some(Resource::Artwork { mime, .. }) => Some(mime),
            _ => None,
        }
    }

    /// Release a handle. Returns false if it was already revoked.
    pub fn revoke(&mut self, handle: ResourceHandle) -> bool {
        self.live.remove(&handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
