//! Lyra Player Core
//!
//! Platform-agnostic domain types, error handling and library storage for
//! Lyra Player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `RecentlyPlayed`, `PlayContext`
//! - **Storage**: the `KeyValueStore` trait and the `Library` built on top of it
//! - **Error Handling**: unified `LyraError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use lyra_core::{Library, MemoryStore, PlayContext, Track, TrackCatalog};
//!
//! let library = Library::new(MemoryStore::new());
//!
//! let track = Track::from_file_name("Blue in Green.mp3", "blob:track-1", 337.0);
//! assert_eq!(track.title, "Blue in Green");
//!
//! library.add_track(track.clone()).unwrap();
//! let playlist = library.create_playlist("Late Night", None).unwrap();
//! library.add_to_playlist(&playlist.id, &track.id).unwrap();
//!
//! let queue = library.tracks_for(&PlayContext::Playlist(playlist.id)).unwrap();
//! assert_eq!(queue.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod library;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{LyraError, Result};
pub use library::{Library, TrackCatalog};
pub use storage::{KeyValueStore, MemoryStore};

pub use types::{
    PlayContext, Playlist, PlaylistId, RecentEntry, RecentlyPlayed, SourceLocator, Track,
    TrackId, DEFAULT_ARTIST,
};
