/// Track domain type
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Artist assigned to tracks whose artist is not known
pub const DEFAULT_ARTIST: &str = "Unknown Artist";

/// Reference to the playable bytes of a track
///
/// In a browser host this is an object URL (`blob:...`) or a data URL; the
/// engine never interprets it and only hands it to the media element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocator(String);

impl SourceLocator {
    /// Wrap a locator string
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this locator is a transient object URL that must be revoked
    /// when the media element lets go of it
    pub fn is_object_url(&self) -> bool {
        self.0.starts_with("blob:")
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Audio track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    #[serde(default = "default_artist")]
    pub artist: String,

    /// Duration in seconds, as reported when the file was added
    #[serde(default)]
    pub duration_seconds: f64,

    /// Where the media element finds the bytes
    pub source: SourceLocator,

    /// When the track was added to the library
    pub added_at: DateTime<Utc>,
}

fn default_artist() -> String {
    DEFAULT_ARTIST.to_string()
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(title: impl Into<String>, source: SourceLocator, duration_seconds: f64) -> Self {
        Self {
            id: TrackId::generate(),
            title: title.into(),
            artist: default_artist(),
            duration_seconds: sanitize_duration(duration_seconds),
            source,
            added_at: Utc::now(),
        }
    }

    /// Create a track from a user-selected file name
    ///
    /// The title is the file name without its final extension.
    pub fn from_file_name(
        file_name: &str,
        source: impl Into<String>,
        duration_seconds: f64,
    ) -> Self {
        Self::new(
            title_from_file_name(file_name),
            SourceLocator::new(source),
            duration_seconds,
        )
    }

    /// Builder-style artist override
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }
}

/// Strip the last extension from a file name
fn title_from_file_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(dot) => &file_name[..dot],
    }
}

fn sanitize_duration(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_drops_only_the_last_extension() {
        let track = Track::from_file_name("song.name.mp3", "blob:1", 10.0);
        assert_eq!(track.title, "song.name");
        assert_eq!(track.artist, DEFAULT_ARTIST);
    }

    #[test]
    fn names_without_extension_are_kept() {
        assert_eq!(title_from_file_name("README"), "README");
        assert_eq!(title_from_file_name(".hidden"), ".hidden");
    }

    #[test]
    fn bad_durations_become_zero() {
        let track = Track::from_file_name("a.ogg", "blob:a", f64::NAN);
        assert_eq!(track.duration_seconds, 0.0);

        let track = Track::from_file_name("a.ogg", "blob:a", -3.0);
        assert_eq!(track.duration_seconds, 0.0);
    }

    #[test]
    fn serializes_camel_case() {
        let track = Track::from_file_name("a.ogg", "blob:a", 12.5);
        let json = serde_json::to_value(&track).unwrap();

        assert_eq!(json["durationSeconds"], 12.5);
        assert_eq!(json["source"], "blob:a");
        assert!(json.get("addedAt").is_some());
    }

    #[test]
    fn missing_artist_defaults_on_load() {
        let json = r#"{
            "id": "t1",
            "title": "Song",
            "source": "data:audio/mpeg;base64,AAAA",
            "addedAt": "2024-01-01T00:00:00Z"
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.artist, DEFAULT_ARTIST);
        assert_eq!(track.duration_seconds, 0.0);
        assert!(!track.source.is_object_url());
    }
}
