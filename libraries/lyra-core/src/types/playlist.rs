/// Playlist domain type
use crate::types::{PlaylistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User playlist: an ordered list of track references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Track references in play order
    #[serde(default)]
    pub track_ids: Vec<TrackId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new, empty playlist
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            description,
            track_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the playlist references a track
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.track_ids.contains(track_id)
    }

    /// Append a track; returns false when it was already present
    pub fn add_track(&mut self, track_id: TrackId) -> bool {
        if self.contains(&track_id) {
            return false;
        }
        self.track_ids.push(track_id);
        self.touch();
        true
    }

    /// Remove a track; returns false when it was not present
    pub fn remove_track(&mut self, track_id: &TrackId) -> bool {
        let before = self.track_ids.len();
        self.track_ids.retain(|id| id != track_id);
        let removed = self.track_ids.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Rename the playlist
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_add_is_noop() {
        let mut playlist = Playlist::new("Mix", None);
        let id = TrackId::new("t1");

        assert!(playlist.add_track(id.clone()));
        let stamp = playlist.updated_at;
        assert!(!playlist.add_track(id));

        assert_eq!(playlist.track_ids.len(), 1);
        assert_eq!(playlist.updated_at, stamp);
    }

    #[test]
    fn remove_missing_track_reports_false() {
        let mut playlist = Playlist::new("Mix", None);
        assert!(!playlist.remove_track(&TrackId::new("ghost")));
    }

    #[test]
    fn description_is_omitted_when_absent() {
        let playlist = Playlist::new("Mix", None);
        let json = serde_json::to_value(&playlist).unwrap();

        assert!(json.get("description").is_none());
        assert!(json.get("trackIds").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
