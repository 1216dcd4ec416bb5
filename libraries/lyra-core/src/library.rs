//! Music library persisted in a key-value store
//!
//! Tracks, playlists and the recently played list each live as one JSON
//! document under their own key. Every mutation is a read-modify-write of the
//! affected document. Reads are tolerant: a document that fails to parse is
//! logged and treated as empty so a corrupted entry never locks the user out
//! of the player.

use crate::error::{LyraError, Result};
use crate::storage::KeyValueStore;
use crate::types::{PlayContext, Playlist, PlaylistId, RecentlyPlayed, Track, TrackId};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Storage key for the track list
pub const TRACKS_KEY: &str = "lyra.tracks";
/// Storage key for the playlist list
pub const PLAYLISTS_KEY: &str = "lyra.playlists";
/// Storage key for the recently played list
pub const RECENT_KEY: &str = "lyra.recent";

/// Default number of entries kept in the recently played list
pub const DEFAULT_RECENT_CAPACITY: usize = 20;

/// Read access to tracks, as needed to build play queues
pub trait TrackCatalog {
    /// Every track in library order
    fn load_tracks(&self) -> Result<Vec<Track>>;

    /// Tracks of a play context, in that context's order
    fn tracks_for(&self, context: &PlayContext) -> Result<Vec<Track>>;
}

/// The user's music library
#[derive(Debug)]
pub struct Library<S> {
    store: S,
    recent_capacity: usize,
}

impl<S: KeyValueStore> Library<S> {
    /// Open a library over a store
    pub fn new(store: S) -> Self {
        Self {
            store,
            recent_capacity: DEFAULT_RECENT_CAPACITY,
        }
    }

    /// Override how many recently played entries are kept
    #[must_use]
    pub fn with_recent_capacity(mut self, capacity: usize) -> Self {
        self.recent_capacity = capacity.max(1);
        self
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Tracks
    // ========================================================================

    /// Add a track to the end of the library
    ///
    /// A track whose id is already present replaces the stored copy in place.
    pub fn add_track(&self, track: Track) -> Result<()> {
        let mut tracks = self.read_tracks()?;
        match tracks.iter_mut().find(|t| t.id == track.id) {
            Some(existing) => *existing = track,
            None => {
                debug!(track_id = %track.id, title = %track.title, "Adding track");
                tracks.push(track);
            }
        }
        self.write(TRACKS_KEY, &tracks)
    }

    /// Look up a single track
    pub fn track(&self, id: &TrackId) -> Result<Track> {
        self.read_tracks()?
            .into_iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| LyraError::TrackNotFound(id.clone()))
    }

    /// Edit the title and artist of a track
    pub fn update_track_details(
        &self,
        id: &TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Result<Track> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LyraError::invalid_input("track title cannot be empty"));
        }

        let mut tracks = self.read_tracks()?;
        let track = tracks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| LyraError::TrackNotFound(id.clone()))?;
        track.title = title;
        track.artist = artist.into();
        let updated = track.clone();

        self.write(TRACKS_KEY, &tracks)?;
        Ok(updated)
    }

    /// Remove a track and every reference to it
    pub fn remove_track(&self, id: &TrackId) -> Result<Track> {
        let mut tracks = self.read_tracks()?;
        let position = tracks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| LyraError::TrackNotFound(id.clone()))?;
        let removed = tracks.remove(position);
        self.write(TRACKS_KEY, &tracks)?;

        let mut playlists = self.playlists()?;
        let mut touched = false;
        for playlist in &mut playlists {
            touched |= playlist.remove_track(id);
        }
        if touched {
            self.write(PLAYLISTS_KEY, &playlists)?;
        }

        let mut recent = self.recently_played()?;
        if recent.forget(id) {
            self.write(RECENT_KEY, &recent)?;
        }

        debug!(track_id = %id, "Removed track");
        Ok(removed)
    }

    fn read_tracks(&self) -> Result<Vec<Track>> {
        self.read(TRACKS_KEY)
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Every playlist in creation order
    pub fn playlists(&self) -> Result<Vec<Playlist>> {
        self.read(PLAYLISTS_KEY)
    }

    /// Look up a single playlist
    pub fn playlist(&self, id: &PlaylistId) -> Result<Playlist> {
        self.playlists()?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| LyraError::PlaylistNotFound(id.clone()))
    }

    /// Create an empty playlist
    pub fn create_playlist(&self, name: &str, description: Option<&str>) -> Result<Playlist> {
        let name = validate_name(name)?;
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let playlist = Playlist::new(name, description);
        let mut playlists = self.playlists()?;
        playlists.push(playlist.clone());
        self.write(PLAYLISTS_KEY, &playlists)?;

        debug!(playlist_id = %playlist.id, name = %playlist.name, "Created playlist");
        Ok(playlist)
    }

    /// Rename a playlist
    pub fn rename_playlist(&self, id: &PlaylistId, name: &str) -> Result<Playlist> {
        let name = validate_name(name)?;
        self.modify_playlist(id, |playlist| {
            playlist.rename(name);
            true
        })
    }

    /// Delete a playlist; its tracks stay in the library
    pub fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        let mut playlists = self.playlists()?;
        let before = playlists.len();
        playlists.retain(|p| &p.id != id);
        if playlists.len() == before {
            return Err(LyraError::PlaylistNotFound(id.clone()));
        }
        self.write(PLAYLISTS_KEY, &playlists)
    }

    /// Append a library track to a playlist
    ///
    /// Adding a track the playlist already holds leaves it unchanged.
    pub fn add_to_playlist(&self, id: &PlaylistId, track_id: &TrackId) -> Result<Playlist> {
        if !self.read_tracks()?.iter().any(|t| &t.id == track_id) {
            return Err(LyraError::TrackNotFound(track_id.clone()));
        }
        self.modify_playlist(id, |playlist| playlist.add_track(track_id.clone()))
    }

    /// Remove a track from a playlist
    pub fn remove_from_playlist(&self, id: &PlaylistId, track_id: &TrackId) -> Result<Playlist> {
        self.modify_playlist(id, |playlist| playlist.remove_track(track_id))
    }

    /// Apply `change` to one playlist, writing back only when it reports a
    /// modification
    fn modify_playlist<F>(&self, id: &PlaylistId, change: F) -> Result<Playlist>
    where
        F: FnOnce(&mut Playlist) -> bool,
    {
        let mut playlists = self.playlists()?;
        let playlist = playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| LyraError::PlaylistNotFound(id.clone()))?;

        let changed = change(playlist);
        let result = playlist.clone();
        if changed {
            self.write(PLAYLISTS_KEY, &playlists)?;
        }
        Ok(result)
    }

    // ========================================================================
    // Recently played
    // ========================================================================

    /// The recently played list, most recent first
    pub fn recently_played(&self) -> Result<RecentlyPlayed> {
        self.read(RECENT_KEY)
    }

    /// Record that a track started playing
    pub fn record_play(&self, track_id: &TrackId) -> Result<()> {
        let mut recent = self.recently_played()?;
        recent.record(track_id.clone(), Utc::now(), self.recent_capacity);
        self.write(RECENT_KEY, &recent)
    }

    // ========================================================================
    // Raw documents
    // ========================================================================

    fn read<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.store.get(key)? else {
            return Ok(T::default());
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "Stored library data is corrupt, reading as empty");
                Ok(T::default())
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }
}

impl<S: KeyValueStore> TrackCatalog for Library<S> {
    fn load_tracks(&self) -> Result<Vec<Track>> {
        self.read_tracks()
    }

    fn tracks_for(&self, context: &PlayContext) -> Result<Vec<Track>> {
        match context {
            PlayContext::Library => self.read_tracks(),
            PlayContext::RecentlyPlayed => {
                let recent = self.recently_played()?;
                Ok(resolve(self.read_tracks()?, recent.track_ids()))
            }
            PlayContext::Playlist(id) => {
                let playlist = self.playlist(id)?;
                Ok(resolve(self.read_tracks()?, playlist.track_ids.iter()))
            }
        }
    }
}

/// Map ids to tracks in id order, skipping ids with no track
fn resolve<'a>(tracks: Vec<Track>, ids: impl Iterator<Item = &'a TrackId>) -> Vec<Track> {
    ids.filter_map(|id| tracks.iter().find(|t| &t.id == id).cloned())
        .collect()
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LyraError::invalid_input("playlist name cannot be empty"));
    }
    Ok(name)
}
