//! Session command surface
//!
//! Everything that reaches a session (user commands, media notifications and
//! animation frames) goes through one inbox, so each is handled to completion
//! before the next one starts.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::host::{FrameToken, MediaEvent};
use crate::queue::Queue;
use crate::types::{RepeatMode, TransportState, VisualizerBars};
use lyra_core::Track;
use tokio::sync::{broadcast, mpsc, watch};

/// User-level playback commands
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Load a track without starting it
    Load(Track),
    /// Replace the queue without touching the current track
    SetQueue(Queue),
    /// Replace the queue, then load and play its cursor track
    PlayQueue(Queue),
    Play,
    Pause,
    /// Play when stopped or paused, pause when playing
    TogglePlayback,
    /// Jump to a position in seconds
    Seek(f64),
    /// Set volume in `[0, 1]`
    SetVolume(f64),
    Next,
    Previous,
    ToggleShuffle,
    /// Step the repeat mode: none, all, one
    CycleRepeatMode,
    SetRepeatMode(RepeatMode),
}

/// A message for the session inbox
#[derive(Debug, Clone)]
pub enum SessionMessage {
    /// User command
    Command(PlayerCommand),
    /// Media element notification
    Media(MediaEvent),
    /// Animation frame delivery
    Frame(FrameToken),
    /// Release hardware and end the session task
    Shutdown,
}

impl From<PlayerCommand> for SessionMessage {
    fn from(command: PlayerCommand) -> Self {
        Self::Command(command)
    }
}

impl From<MediaEvent> for SessionMessage {
    fn from(event: MediaEvent) -> Self {
        Self::Media(event)
    }
}

/// Sending half of a session inbox
pub type Inbox = mpsc::UnboundedSender<SessionMessage>;

/// Create a session inbox
pub fn inbox() -> (Inbox, mpsc::UnboundedReceiver<SessionMessage>) {
    mpsc::unbounded_channel()
}

/// Cloneable front end to a running session
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    inbox: Inbox,
    state: watch::Receiver<TransportState>,
    bars: watch::Receiver<VisualizerBars>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlayerHandle {
    pub(crate) fn new(
        inbox: Inbox,
        state: watch::Receiver<TransportState>,
        bars: watch::Receiver<VisualizerBars>,
        events: broadcast::Sender<PlaybackEvent>,
    ) -> Self {
        Self {
            inbox,
            state,
            bars,
            events,
        }
    }

    /// Queue a command for the session
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        self.inbox
            .send(SessionMessage::Command(command))
            .map_err(|_| PlaybackError::SessionClosed)
    }

    /// Ask the session to release its hardware and stop
    pub fn shutdown(&self) -> Result<()> {
        self.inbox
            .send(SessionMessage::Shutdown)
            .map_err(|_| PlaybackError::SessionClosed)
    }

    /// Latest transport snapshot
    pub fn transport_state(&self) -> TransportState {
        self.state.borrow().clone()
    }

    /// Latest visualizer bars
    pub fn visualizer_bars(&self) -> VisualizerBars {
        self.bars.borrow().clone()
    }

    /// Watch transport snapshots
    pub fn watch_state(&self) -> watch::Receiver<TransportState> {
        self.state.clone()
    }

    /// Watch visualizer bars
    pub fn watch_bars(&self) -> watch::Receiver<VisualizerBars> {
        self.bars.clone()
    }

    /// Subscribe to notifications emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }
}
