//! Playback session
//!
//! Owns the media element, the spectrum sampler and the render loop for its
//! whole lifetime, and keeps the transport state consistent with them. Tracks
//! swap through the same hardware; at most one is current at a time.
//!
//! A session is driven either directly through its async methods or as an
//! actor via [`PlaybackSession::run`], which drains a [`SessionMessage`]
//! inbox one message at a time.

use crate::command::{Inbox, PlayerCommand, PlayerHandle, SessionMessage};
use crate::config::PlaybackConfig;
use crate::error::Result;
use crate::events::PlaybackEvent;
use crate::host::{AnalysisBackend, FrameScheduler, FrameToken, MediaElement, MediaEvent};
use crate::policy::{decide, Advance, AdvanceTrigger};
use crate::queue::Queue;
use crate::scheduler::RenderLoop;
use crate::spectrum::SpectrumSampler;
use crate::transport::{transition, TransportEvent};
use crate::types::{PlaybackState, RepeatMode, TransportState, VisualizerBars};
use crate::visualizer::reduce;
use lyra_core::{Track, TrackId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, trace, warn};

/// The live owner of playback and analysis hardware
pub struct PlaybackSession<M, A, F>
where
    M: MediaElement,
    A: AnalysisBackend<Source = M::Source>,
    F: FrameScheduler,
{
    media: M,
    sampler: SpectrumSampler<A>,
    render: RenderLoop<F>,
    queue: Queue,
    current: Option<Track>,
    transport: TransportState,
    bar_count: usize,
    rng: StdRng,

    // Observers
    state_tx: watch::Sender<TransportState>,
    bars_tx: watch::Sender<VisualizerBars>,
    events_tx: broadcast::Sender<PlaybackEvent>,
}

impl<M, A, F> PlaybackSession<M, A, F>
where
    M: MediaElement,
    A: AnalysisBackend<Source = M::Source>,
    F: FrameScheduler,
{
    /// Create a session over host hardware
    pub fn new(config: &PlaybackConfig, media: M, analysis: A, frames: F) -> Self {
        let transport = TransportState::new(config.initial_volume, config.shuffle, config.repeat);
        let (state_tx, _) = watch::channel(transport.clone());
        let (bars_tx, _) = watch::channel(VisualizerBars::zeros(config.bar_count));
        let (events_tx, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            media,
            sampler: SpectrumSampler::new(analysis, config.fft_size),
            render: RenderLoop::new(frames),
            queue: Queue::new(),
            current: None,
            transport,
            bar_count: config.bar_count,
            rng: StdRng::from_entropy(),
            state_tx,
            bars_tx,
            events_tx,
        }
    }

    /// Replace the shuffle random source
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Front end for a session that will [`run`](Self::run) on `inbox`
    pub fn handle(&self, inbox: Inbox) -> PlayerHandle {
        PlayerHandle::new(
            inbox,
            self.state_tx.subscribe(),
            self.bars_tx.subscribe(),
            self.events_tx.clone(),
        )
    }

    /// Subscribe to notifications emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events_tx.subscribe()
    }

    // ===== Observation =====

    pub fn transport_state(&self) -> &TransportState {
        &self.transport
    }

    /// Latest published visualizer bars
    pub fn visualizer_bars(&self) -> VisualizerBars {
        self.bars_tx.borrow().clone()
    }

    /// The loaded track
    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    // ===== Track lifecycle =====

    /// Load a track without starting it
    ///
    /// When the track is in the current queue the cursor moves to it,
    /// otherwise the queue becomes just this track. On rejection the session
    /// goes idle and the queue does not advance.
    pub fn load(&mut self, track: Track) -> Result<()> {
        let is_current = self.queue.current().is_some_and(|t| t.id == track.id);
        if !is_current {
            match self.queue.position_of(&track.id) {
                Some(index) => {
                    self.queue.set_cursor(index);
                }
                None => self.set_queue(Queue::single(track.clone())),
            }
        }

        let result = self.load_source(track);
        self.publish();
        result
    }

    fn load_source(&mut self, track: Track) -> Result<()> {
        let previous_track_id = self.teardown();

        if let Err(e) = self.media.set_source(&track) {
            warn!(track_id = %track.id, error = %e, "Failed to load track");
            self.apply(TransportEvent::LoadFailed);
            self.emit(PlaybackEvent::TrackFailed {
                track_id: track.id,
                message: e.to_string(),
            });
            return Err(e);
        }

        let source = self.media.source();
        self.sampler.attach(&source);
        self.media.set_volume(self.transport.volume);

        info!(track_id = %track.id, title = %track.title, "Loaded track");
        self.transport.current_track_id = Some(track.id.clone());
        self.apply(TransportEvent::Load);
        self.emit(PlaybackEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });
        self.current = Some(track);
        Ok(())
    }

    /// Stop rendering and release the current source
    ///
    /// Returns the id of the track that was current.
    fn teardown(&mut self) -> Option<TrackId> {
        self.render.stop();
        let previous = self.current.take();
        if previous.is_some() {
            self.media.pause();
            self.media.release();
        }
        self.transport.reset_times();
        self.transport.current_track_id = None;
        self.publish_bars(VisualizerBars::zeros(self.bar_count));
        previous.map(|track| track.id)
    }

    /// Release the track and go idle at the end of the queue
    fn stop(&mut self) {
        self.teardown();
        self.apply(TransportEvent::Stopped);
        info!("End of playback");
        self.emit(PlaybackEvent::EndOfPlayback);
        self.publish();
    }

    /// Release all hardware
    pub fn shutdown(&mut self) {
        self.teardown();
        self.sampler.detach();
        self.apply(TransportEvent::Stopped);
        self.publish();
    }

    // ===== Transport =====

    /// Start or resume playback
    ///
    /// Does nothing without a loaded track or while already playing. A
    /// rejected start leaves the state unchanged and emits `PlaybackBlocked`.
    pub async fn play(&mut self) -> Result<()> {
        if self.current.is_none() {
            debug!("Play ignored, no track loaded");
            return Ok(());
        }
        if self.transport.state == PlaybackState::Playing {
            return Ok(());
        }

        self.sampler.resume().await;

        if let Err(e) = self.media.play().await {
            warn!(error = %e, "Playback start rejected");
            self.emit(PlaybackEvent::PlaybackBlocked {
                message: e.to_string(),
            });
            self.publish();
            return Err(e);
        }

        self.apply(TransportEvent::PlayStarted);
        self.render.start();
        self.publish();
        Ok(())
    }

    /// Pause playback; idempotent
    pub fn pause(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.media.pause();
        self.render.stop();
        self.apply(TransportEvent::Paused);
        self.publish();
    }

    /// Play when not playing, pause otherwise
    pub async fn toggle_playback(&mut self) -> Result<()> {
        if self.transport.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play().await
        }
    }

    /// Jump to `seconds`, clamped into the track
    pub fn seek(&mut self, seconds: f64) {
        if self.current.is_none() {
            return;
        }
        let position = self.clamp_position(seconds);
        self.media.set_current_time(position);
        self.transport.current_time_seconds = position;
        self.publish();
    }

    /// Set the volume, clamped into `[0, 1]`; non-finite values are ignored
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            debug!(volume, "Ignoring non-finite volume");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.media.set_volume(volume);
        self.transport.volume = volume;
        self.emit(PlaybackEvent::VolumeChanged { volume });
        self.publish();
    }

    pub fn toggle_shuffle(&mut self) {
        self.transport.is_shuffle = !self.transport.is_shuffle;
        self.emit(PlaybackEvent::ShuffleChanged {
            enabled: self.transport.is_shuffle,
        });
        self.publish();
    }

    /// Step the repeat mode: none, all, one, none
    pub fn cycle_repeat_mode(&mut self) {
        self.set_repeat_mode(self.transport.repeat_mode.cycle());
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        if self.transport.repeat_mode == mode {
            return;
        }
        self.transport.repeat_mode = mode;
        self.emit(PlaybackEvent::RepeatModeChanged { mode });
        self.publish();
    }

    fn clamp_position(&self, seconds: f64) -> f64 {
        let seconds = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
        if self.transport.duration_seconds > 0.0 {
            seconds.min(self.transport.duration_seconds)
        } else {
            seconds
        }
    }

    // ===== Queue =====

    /// Replace the queue; the current track keeps playing
    pub fn set_queue(&mut self, queue: Queue) {
        self.queue = queue;
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Replace the queue, then load and play its cursor track
    pub async fn play_queue(&mut self, queue: Queue) -> Result<()> {
        self.set_queue(queue);
        let Some(track) = self.queue.current().cloned() else {
            debug!("Queue has no selected track");
            self.publish();
            return Ok(());
        };
        self.select(track).await
    }

    /// Skip to the next track
    pub async fn next(&mut self) -> Result<()> {
        self.advance(AdvanceTrigger::UserNext).await
    }

    /// Go back one track, or to the start of the first one
    ///
    /// After the queue has ended this reloads and plays the cursor track.
    pub async fn previous(&mut self) -> Result<()> {
        self.advance(AdvanceTrigger::UserPrevious).await
    }

    async fn advance(&mut self, trigger: AdvanceTrigger) -> Result<()> {
        let decision = decide(
            self.queue.len(),
            self.queue.cursor(),
            self.transport.is_shuffle,
            self.transport.repeat_mode,
            trigger,
            &mut self.rng,
        );
        debug!(?trigger, ?decision, "Advance");

        match decision {
            Advance::Select(index) => {
                self.queue.set_cursor(index);
                match self.queue.get(index).cloned() {
                    Some(track) => self.select(track).await,
                    None => Ok(()),
                }
            }
            Advance::Replay => {
                self.seek(0.0);
                self.play().await
            }
            Advance::Restart if self.current.is_some() => {
                self.seek(0.0);
                Ok(())
            }
            // Playback already stopped: bring the cursor track back
            Advance::Restart => match self.queue.current().cloned() {
                Some(track) => self.select(track).await,
                None => Ok(()),
            },
            Advance::Stay => Ok(()),
            Advance::Stop => {
                self.stop();
                Ok(())
            }
        }
    }

    async fn select(&mut self, track: Track) -> Result<()> {
        if let Err(e) = self.load_source(track) {
            self.publish();
            return Err(e);
        }
        self.publish();
        self.play().await
    }

    // ===== Media notifications =====

    /// Duration became known
    pub fn on_metadata_loaded(&mut self, duration: f64) {
        if self.current.is_none() {
            return;
        }
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.transport.duration_seconds = duration;
        if duration > 0.0 {
            self.transport.current_time_seconds = self.transport.current_time_seconds.min(duration);
        }
        self.apply(TransportEvent::MetadataLoaded);
        self.publish();
    }

    /// Position report from the media element
    pub fn on_position_update(&mut self, seconds: f64) {
        if self.current.is_none() {
            return;
        }
        self.transport.current_time_seconds = self.clamp_position(seconds);
        self.publish();
    }

    /// The current track played to its end
    pub async fn on_ended(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Ok(());
        }
        self.render.stop();
        self.apply(TransportEvent::Ended);
        self.publish();
        self.advance(AdvanceTrigger::NaturalEnd).await
    }

    /// The media element failed to load or decode the current track
    pub fn on_media_error(&mut self, message: &str) {
        let Some(track_id) = self.teardown() else {
            return;
        };
        warn!(%track_id, message, "Media error, releasing track");
        self.apply(TransportEvent::LoadFailed);
        self.emit(PlaybackEvent::TrackFailed {
            track_id,
            message: message.to_string(),
        });
        self.publish();
    }

    /// Deliver an animation frame
    ///
    /// Only the pending frame is honored, and only while playing: sample,
    /// reduce, publish bars, then request the next frame.
    pub fn on_frame(&mut self, token: FrameToken) {
        if !self.render.on_frame(token) {
            trace!(token = token.get(), "Ignoring stale frame");
            return;
        }
        if !self.transport.is_playing {
            return;
        }
        let bars = reduce(self.sampler.sample(), self.bar_count);
        self.publish_bars(bars.into());
        self.render.start();
    }

    // ===== Message handling =====

    /// Execute one command
    pub async fn dispatch(&mut self, command: PlayerCommand) -> Result<()> {
        match command {
            PlayerCommand::Load(track) => self.load(track),
            PlayerCommand::SetQueue(queue) => {
                self.set_queue(queue);
                Ok(())
            }
            PlayerCommand::PlayQueue(queue) => self.play_queue(queue).await,
            PlayerCommand::Play => self.play().await,
            PlayerCommand::Pause => {
                self.pause();
                Ok(())
            }
            PlayerCommand::TogglePlayback => self.toggle_playback().await,
            PlayerCommand::Seek(seconds) => {
                self.seek(seconds);
                Ok(())
            }
            PlayerCommand::SetVolume(volume) => {
                self.set_volume(volume);
                Ok(())
            }
            PlayerCommand::Next => self.next().await,
            PlayerCommand::Previous => self.previous().await,
            PlayerCommand::ToggleShuffle => {
                self.toggle_shuffle();
                Ok(())
            }
            PlayerCommand::CycleRepeatMode => {
                self.cycle_repeat_mode();
                Ok(())
            }
            PlayerCommand::SetRepeatMode(mode) => {
                self.set_repeat_mode(mode);
                Ok(())
            }
        }
    }

    /// Apply one media element notification
    pub async fn handle_media_event(&mut self, event: MediaEvent) -> Result<()> {
        match event {
            MediaEvent::MetadataLoaded { duration } => self.on_metadata_loaded(duration),
            MediaEvent::PositionChanged { position } => self.on_position_update(position),
            MediaEvent::Ended => return self.on_ended().await,
            MediaEvent::Error { message } => self.on_media_error(&message),
        }
        Ok(())
    }

    /// Handle one inbox message to completion
    ///
    /// Failures are logged here; they have already been reported through
    /// notifications.
    pub async fn handle_message(&mut self, message: SessionMessage) {
        let result = match message {
            SessionMessage::Command(command) => self.dispatch(command).await,
            SessionMessage::Media(event) => self.handle_media_event(event).await,
            SessionMessage::Frame(token) => {
                self.on_frame(token);
                Ok(())
            }
            SessionMessage::Shutdown => {
                self.shutdown();
                Ok(())
            }
        };

        if let Err(e) = result {
            debug!(error = %e, "Session message failed");
        }
    }

    /// Process the inbox until it closes or a shutdown arrives
    pub async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<SessionMessage>) {
        info!("Playback session started");

        while let Some(message) = inbox.recv().await {
            let is_shutdown = matches!(message, SessionMessage::Shutdown);
            self.handle_message(message).await;
            if is_shutdown {
                break;
            }
        }

        self.shutdown();
        info!("Playback session stopped");
    }

    // ===== Internals =====

    fn apply(&mut self, event: TransportEvent) {
        let from = self.transport.state;
        let to = transition(from, event);
        self.transport.is_playing = to == PlaybackState::Playing;
        if from != to {
            debug!(?from, ?to, ?event, "Transport transition");
            self.transport.state = to;
            self.emit(PlaybackEvent::StateChanged { state: to });
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine
        let _ = self.events_tx.send(event);
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.transport.clone());
    }

    fn publish_bars(&self, bars: VisualizerBars) {
        self.bars_tx.send_replace(bars);
    }
}
