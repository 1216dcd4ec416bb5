//! Hardware seams
//!
//! The engine never talks to audio hardware directly. A host provides three
//! capabilities: a media element that decodes and plays one source at a time,
//! an analysis backend that turns the element's signal into frequency bins,
//! and a frame scheduler that calls back at display refresh cadence.
//!
//! Hosts are single-threaded, so the async methods here produce futures that
//! are not required to be `Send`.

use crate::error::Result;
use lyra_core::Track;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback hardware for one source at a time
#[allow(async_fn_in_trait)]
pub trait MediaElement {
    /// Handle identifying this element's output as an analysis input
    type Source: Clone + PartialEq + fmt::Debug;

    /// The analysis input for this element
    fn source(&self) -> Self::Source;

    /// Assign a track's bytes as the current source
    ///
    /// Returns `SourceLoad` when the element refuses the source outright.
    /// Decode failures discovered later arrive as [`MediaEvent::Error`].
    fn set_source(&mut self, track: &Track) -> Result<()>;

    /// Let go of the current source and any transient handle created for it
    fn release(&mut self);

    /// Start or resume playback
    async fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Jump to a position in seconds
    fn set_current_time(&mut self, seconds: f64);

    /// Set output volume in `[0, 1]`
    fn set_volume(&mut self, volume: f64);
}

/// Real-time frequency analyzer
#[allow(async_fn_in_trait)]
pub trait AnalysisBackend {
    /// Analysis input type, matching [`MediaElement::Source`]
    type Source: Clone + PartialEq + fmt::Debug;

    /// Build the analysis context; returns the number of frequency bins
    fn initialize(&mut self, fft_size: u32) -> Result<usize>;

    /// Route `source` into the analyzer
    fn connect(&mut self, source: &Self::Source) -> Result<()>;

    /// Remove `source` from the analyzer
    fn disconnect(&mut self, source: &Self::Source);

    /// Copy the current magnitudes (`0..=255`) into `out`
    fn frequency_data(&mut self, out: &mut [u8]);

    /// Whether the hardware context is suspended
    fn is_suspended(&self) -> bool;

    /// Resume a suspended context
    async fn resume(&mut self) -> Result<()>;
}

/// Identifies one requested animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameToken(u64);

impl FrameToken {
    /// Wrap a raw token
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw token value
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Display-refresh callback source
///
/// A requested frame is delivered back to the session as
/// `SessionMessage::Frame(token)`.
pub trait FrameScheduler {
    /// Request one callback at the next display refresh
    ///
    /// An `Err` means no callback will arrive for this request.
    fn request_frame(&mut self) -> Result<FrameToken>;

    /// Cancel a pending request; cancelling a delivered token is harmless
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Notifications raised by the media element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Duration became known
    MetadataLoaded {
        /// Track length in seconds
        duration: f64,
    },

    /// Periodic position report
    PositionChanged {
        /// Position in seconds
        position: f64,
    },

    /// The source played to its end
    Ended,

    /// The source failed to load or decode
    Error {
        /// Host description of the failure
        message: String,
    },
}
