/// Play context: which collection a queue was built from
use crate::types::PlaylistId;
use serde::{Deserialize, Serialize};

/// Source collection for a play queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum PlayContext {
    /// Every track in the library, in library order
    #[default]
    Library,
    /// The recently played list, most recent first
    RecentlyPlayed,
    /// A single playlist, in playlist order
    Playlist(PlaylistId),
}
