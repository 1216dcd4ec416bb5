/// Recently played list
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the recently played list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    /// Track that was played
    pub track_id: TrackId,

    /// When playback of the track started
    pub played_at: DateTime<Utc>,
}

/// Most-recent-first list of played tracks, deduplicated and capped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentlyPlayed {
    entries: Vec<RecentEntry>,
}

impl RecentlyPlayed {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a play at the front, dropping any older entry for the same
    /// track and trimming to `capacity`
    pub fn record(&mut self, track_id: TrackId, played_at: DateTime<Utc>, capacity: usize) {
        self.entries.retain(|entry| entry.track_id != track_id);
        self.entries.insert(
            0,
            RecentEntry {
                track_id,
                played_at,
            },
        );
        self.entries.truncate(capacity);
    }

    /// Drop every entry for a track; returns true if anything was removed
    pub fn forget(&mut self, track_id: &TrackId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.track_id != track_id);
        self.entries.len() != before
    }

    /// Entries, most recent first
    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    /// Track ids, most recent first
    pub fn track_ids(&self) -> impl Iterator<Item = &TrackId> {
        self.entries.iter().map(|entry| &entry.track_id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been played yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
