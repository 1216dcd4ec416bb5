//! Play queue
//!
//! An ordered list of tracks for the current play context plus a cursor on
//! the current one. The queue is a copy: replacing or advancing it never
//! touches the library it was built from.

use crate::error::Result;
use lyra_core::{PlayContext, Track, TrackCatalog, TrackId};

/// Ordered tracks with a cursor
///
/// The cursor is either a valid index or `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl Queue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue with the cursor at `start` (ignored when out of range)
    pub fn with_tracks(tracks: Vec<Track>, start: Option<usize>) -> Self {
        let cursor = start.filter(|&i| i < tracks.len());
        Self { tracks, cursor }
    }

    /// Queue holding a single track, selected
    pub fn single(track: Track) -> Self {
        Self {
            tracks: vec![track],
            cursor: Some(0),
        }
    }

    /// Build the queue for a play context
    ///
    /// The cursor lands on `start` when that track is part of the context,
    /// otherwise on the first track.
    pub fn from_context<C: TrackCatalog + ?Sized>(
        catalog: &C,
        context: &PlayContext,
        start: Option<&TrackId>,
    ) -> Result<Self> {
        let tracks = catalog.tracks_for(context)?;
        let cursor = start
            .and_then(|id| tracks.iter().position(|t| &t.id == id))
            .or_else(|| (!tracks.is_empty()).then_some(0));
        Ok(Self { tracks, cursor })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Index of the current track
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// First index holding `id`
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Move the cursor; returns false (and leaves it) when out of range
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyra_core::{Library, MemoryStore};

    fn track(name: &str) -> Track {
        Track::from_file_name(&format!("{name}.mp3"), format!("blob:{name}"), 60.0)
    }

    #[test]
    fn out_of_range_start_is_ignored() {
        let queue = Queue::with_tracks(vec![track("a")], Some(3));
        assert_eq!(queue.cursor(), None);
        assert!(queue.current().is_none());
    }

    #[test]
    fn set_cursor_checks_bounds() {
        let mut queue = Queue::with_tracks(vec![track("a"), track("b")], None);
        assert!(queue.set_cursor(1));
        assert!(!queue.set_cursor(2));
        assert_eq!(queue.current().unwrap().title, "b");
    }

    #[test]
    fn from_context_selects_start_track() {
        let library = Library::new(MemoryStore::new());
        let tracks = [track("a"), track("b"), track("c")];
        for t in &tracks {
            library.add_track(t.clone()).unwrap();
        }

        let queue = Queue::from_context(&library, &PlayContext::Library, Some(&tracks[2].id))
            .unwrap();
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.cursor(), Some(2));

        let queue = Queue::from_context(&library, &PlayContext::Library, None).unwrap();
        assert_eq!(queue.cursor(), Some(0));
    }

    #[test]
    fn from_empty_context_has_no_cursor() {
        let library = Library::new(MemoryStore::new());
        let queue = Queue::from_context(&library, &PlayContext::RecentlyPlayed, None).unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
    }
}
