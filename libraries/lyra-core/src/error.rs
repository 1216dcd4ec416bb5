/// Core error types for Lyra Player
use thiserror::Error;

use crate::types::{PlaylistId, TrackId};

/// Result type alias using `LyraError`
pub type Result<T> = std::result::Result<T, LyraError>;

/// Core error type for Lyra Player
#[derive(Error, Debug)]
pub enum LyraError {
    /// Key-value store failures (quota exceeded, storage disabled)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl LyraError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
