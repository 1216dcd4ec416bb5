//! Error types for the playback engine

use lyra_core::LyraError;
use thiserror::Error;

/// Playback errors
///
/// None of these are fatal to a session: the session recovers into a
/// consistent state and reports the error to whoever issued the command.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The host cannot do audio analysis (no Web Audio, context creation refused)
    #[error("Audio analysis unsupported: {0}")]
    UnsupportedEnvironment(String),

    /// The media element rejected a track's source
    #[error("Failed to load source: {0}")]
    SourceLoad(String),

    /// Playback start was rejected (typically an autoplay policy)
    #[error("Playback start rejected: {0}")]
    PlaybackStart(String),

    /// Any other failure reported by the audio hardware
    #[error("Audio hardware error: {0}")]
    Hardware(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The session task is gone and can no longer receive commands
    #[error("Playback session closed")]
    SessionClosed,

    /// Library collaborator failure
    #[error(transparent)]
    Library(#[from] LyraError),
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
