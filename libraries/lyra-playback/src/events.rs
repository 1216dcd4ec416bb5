//! Playback Events
//!
//! Notifications for UI synchronization. The session broadcasts one event per
//! observable change; the latest [`TransportState`](crate::TransportState)
//! is available separately, so subscribers that lag can resynchronize from it.

use crate::types::{PlaybackState, RepeatMode};
use lyra_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport state machine moved
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// A new track was loaded
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// A track could not be loaded or decoded; the session went idle
    TrackFailed {
        /// ID of the failed track
        track_id: TrackId,
        /// Failure description
        message: String,
    },

    /// The host refused to start playback (autoplay policy); retry from a
    /// user gesture
    PlaybackBlocked {
        /// Failure description
        message: String,
    },

    /// The queue ran out and nothing else will play
    EndOfPlayback,

    /// Volume changed
    VolumeChanged {
        /// New volume in `[0, 1]`
        volume: f64,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is now on
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatModeChanged {
        /// The new mode
        mode: RepeatMode,
    },

    /// Queue replaced
    QueueChanged {
        /// New queue length
        length: usize,
    },
}
