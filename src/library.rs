//! The in-memory music library: import pipeline, tracks and groupings.

mod error;
mod grouping;
mod import;
mod model;
mod probe;
mod resources;
mod scan;
mod store;

pub use error::ImportError;
pub use import::{ImportedFile, Importer, Picture, TagReader, TrackTags};
pub use model::{Album, Artist, Track, TrackId};
pub use probe::DurationProbe;
pub use resources::{Resource, ResourceHandle, ResourceRegistry};
pub use store::LibraryStore;
