//! Core types for the playback engine

use lyra_core::TrackId;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// Transport state of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No track loaded
    #[default]
    Idle,

    /// Source assigned, waiting for metadata
    Loading,

    /// Ready to play, or paused mid-track
    Paused,

    /// Currently playing
    Playing,

    /// The track reached its end
    Ended,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    #[serde(rename = "none", alias = "off")]
    Off,

    /// Loop the entire queue
    All,

    /// Loop the current track only
    One,
}

impl RepeatMode {
    /// The mode after this one in the repeat button cycle
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Observable snapshot of a session's transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportState {
    /// State machine position
    pub state: PlaybackState,

    /// True only while `state` is `Playing`
    pub is_playing: bool,

    /// Playback position
    pub current_time_seconds: f64,

    /// Track length, 0 until metadata is known
    pub duration_seconds: f64,

    /// Output volume in `[0, 1]`
    pub volume: f64,

    /// Shuffle toggle
    pub is_shuffle: bool,

    /// Repeat mode
    pub repeat_mode: RepeatMode,

    /// Currently loaded track
    pub current_track_id: Option<TrackId>,
}

impl TransportState {
    /// Initial state for a new session
    pub fn new(volume: f64, is_shuffle: bool, repeat_mode: RepeatMode) -> Self {
        Self {
            state: PlaybackState::Idle,
            is_playing: false,
            current_time_seconds: 0.0,
            duration_seconds: 0.0,
            volume: volume.clamp(0.0, 1.0),
            is_shuffle,
            repeat_mode,
            current_track_id: None,
        }
    }

    pub(crate) fn reset_times(&mut self) {
        self.current_time_seconds = 0.0;
        self.duration_seconds = 0.0;
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self::new(1.0, false, RepeatMode::Off)
    }
}

/// Normalized bar magnitudes for the spectrum display
///
/// Always replaced wholesale; readers keep whatever snapshot they cloned.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerBars(Arc<[f32]>);

impl VisualizerBars {
    /// `count` bars at zero
    pub fn zeros(count: usize) -> Self {
        Self(vec![0.0; count].into())
    }

    /// Borrow as a slice
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for VisualizerBars {
    fn from(bars: Vec<f32>) -> Self {
        Self(bars.into())
    }
}

impl Deref for VisualizerBars {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}
