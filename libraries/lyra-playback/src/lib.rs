//! Lyra Player - Playback Engine
//!
//! Platform-agnostic audio playback and spectrum visualization for Lyra
//! Player.
//!
//! This crate provides:
//! - A playback session owning one media element, one analyzer and one frame
//!   scheduler for its lifetime
//! - The transport state machine (load, play, pause, seek, volume, ended)
//! - Shuffle and repeat (none, all, one) over a cursor-tracked queue
//! - A spectrum sampler and visualizer reducer driven by a render loop that
//!   only runs while audio plays
//! - Notifications over `tokio::sync::broadcast` and snapshots over
//!   `tokio::sync::watch`
//!
//! # Architecture
//!
//! Hardware is reached only through the traits in [`host`]. The `wasm`
//! feature provides browser implementations (`HTMLAudioElement`, Web Audio
//! `AnalyserNode`, `requestAnimationFrame`, `localStorage`) and a
//! JavaScript-facing `WebPlayer`.
//!
//! # Example: Driving a session
//!
//! ```rust,no_run
//! use lyra_playback::{
//!     inbox, PlaybackConfig, PlaybackSession, PlayerCommand, Queue,
//! };
//! # use lyra_playback::host::{AnalysisBackend, FrameScheduler, MediaElement};
//! # async fn example<M, A, F>(media: M, analysis: A, frames: F, tracks: Vec<lyra_core::Track>)
//! # where
//! #     M: MediaElement,
//! #     A: AnalysisBackend<Source = M::Source>,
//! #     F: FrameScheduler,
//! # {
//! let config = PlaybackConfig::default();
//! let (tx, rx) = inbox();
//!
//! let session = PlaybackSession::new(&config, media, analysis, frames);
//! let player = session.handle(tx);
//!
//! player.send(PlayerCommand::PlayQueue(Queue::with_tracks(tracks, Some(0)))).ok();
//! player.send(PlayerCommand::SetVolume(0.8)).ok();
//!
//! // Runs until `player.shutdown()`
//! session.run(rx).await;
//! # }
//! ```

pub mod command;
pub mod config;
mod error;
pub mod events;
pub mod host;
pub mod policy;
mod queue;
pub mod scheduler;
mod session;
pub mod spectrum;
pub mod transport;
pub mod types;
pub mod visualizer;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export main types
pub use command::{inbox, Inbox, PlayerCommand, PlayerHandle, SessionMessage};
pub use config::PlaybackConfig;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use host::{AnalysisBackend, FrameScheduler, FrameToken, MediaElement, MediaEvent};
pub use policy::{decide, Advance, AdvanceTrigger};
pub use queue::Queue;
pub use session::PlaybackSession;
pub use types::{PlaybackState, RepeatMode, TransportState, VisualizerBars};
