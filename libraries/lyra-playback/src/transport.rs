//! Transport state machine
//!
//! ```text
//! Idle ──Load──▶ Loading ──MetadataLoaded──▶ Paused ──PlayStarted──▶ Playing
//!                   │                          ▲                       │
//!                   └─────PlayStarted──────────┼──────────────────────▶│
//!                                              └────────Paused─────────┤
//!                                                                      ▼
//!                            Loading ◀──Load── Ended ◀──────Ended──────┘
//! ```
//!
//! `Stopped` and `LoadFailed` return to `Idle` from anywhere.

use crate::types::PlaybackState;

/// Inputs to the transport state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportEvent {
    /// A new source was assigned
    Load,
    /// The source's duration became known
    MetadataLoaded,
    /// The hardware confirmed playback start
    PlayStarted,
    /// Playback was paused
    Paused,
    /// The source played to its end
    Ended,
    /// The session let go of its track
    Stopped,
    /// The source was rejected or failed to decode
    LoadFailed,
}

/// Next transport state for `event` in `state`
pub fn transition(state: PlaybackState, event: TransportEvent) -> PlaybackState {
    use PlaybackState::{Ended, Idle, Loading, Paused, Playing};

    match (state, event) {
        (_, TransportEvent::Load) => Loading,
        (_, TransportEvent::Stopped | TransportEvent::LoadFailed) => Idle,

        (Loading, TransportEvent::MetadataLoaded) => Paused,
        (other, TransportEvent::MetadataLoaded) => other,

        (Loading | Paused | Ended | Playing, TransportEvent::PlayStarted) => Playing,
        (Idle, TransportEvent::PlayStarted) => Idle,

        (Idle, TransportEvent::Paused) => Idle,
        (_, TransportEvent::Paused) => Paused,

        (Idle, TransportEvent::Ended) => Idle,
        (_, TransportEvent::Ended) => Ended,
    }
}
