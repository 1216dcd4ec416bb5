mod context;
mod ids;
mod playlist;
mod recent;
mod track;

pub use context::PlayContext;
pub use ids::{PlaylistId, TrackId};
pub use playlist::Playlist;
pub use recent::{RecentEntry, RecentlyPlayed};
pub use track::{SourceLocator, Track, DEFAULT_ARTIST};
