//! Shared fakes for session tests
//!
//! One `Rig` records every hardware call made by a session so tests can
//! assert on what reached the "hardware" and in which order.

#![allow(dead_code)]

use lyra_core::{SourceLocator, Track, TrackId};
use lyra_playback::{
    AnalysisBackend, FrameScheduler, FrameToken, MediaElement, PlaybackConfig, PlaybackError,
    PlaybackSession, Result,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Once;

/// Hardware calls observed by the rig
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(TrackId),
    Release,
    Play,
    Pause,
    SetCurrentTime(f64),
    SetVolume(f64),
    Initialize(u32),
    Connect,
    Disconnect,
    Resume,
    RequestFrame(FrameToken),
    CancelFrame(FrameToken),
}

#[derive(Debug, Default)]
struct RigState {
    calls: Vec<Call>,
    reject_play: bool,
    failing_sources: HashSet<String>,
    no_analysis: bool,
    refuse_frames: bool,
    suspended: bool,
    level: u8,
    next_token: u64,
}

/// Shared control panel for the fakes
#[derive(Debug, Clone, Default)]
pub struct Rig(Rc<RefCell<RigState>>);

pub type TestSession = PlaybackSession<FakeMedia, FakeAnalysis, FakeFrames>;

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session over this rig with a fixed shuffle seed
    pub fn session(&self) -> TestSession {
        self.session_with(&PlaybackConfig::default())
    }

    pub fn session_with(&self, config: &PlaybackConfig) -> TestSession {
        PlaybackSession::new(
            config,
            FakeMedia(self.clone()),
            FakeAnalysis(self.clone()),
            FakeFrames(self.clone()),
        )
        .with_rng(StdRng::seed_from_u64(42))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().calls.iter().filter(|c| *c == call).count()
    }

    /// Token of the most recent frame request
    pub fn last_requested_frame(&self) -> Option<FrameToken> {
        self.0.borrow().calls.iter().rev().find_map(|c| match c {
            Call::RequestFrame(token) => Some(*token),
            _ => None,
        })
    }

    pub fn reject_play(&self, reject: bool) {
        self.0.borrow_mut().reject_play = reject;
    }

    /// Make the media element refuse tracks with this source locator
    pub fn fail_source(&self, locator: &str) {
        self.0.borrow_mut().failing_sources.insert(locator.to_string());
    }

    pub fn disable_analysis(&self) {
        self.0.borrow_mut().no_analysis = true;
    }

    /// Make the frame scheduler refuse requests
    pub fn refuse_frames(&self, refuse: bool) {
        self.0.borrow_mut().refuse_frames = refuse;
    }

    pub fn suspend(&self) {
        self.0.borrow_mut().suspended = true;
    }

    /// Magnitude reported for every frequency bin
    pub fn set_level(&self, level: u8) {
        self.0.borrow_mut().level = level;
    }

    fn record(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }

    fn state(&self) -> Ref<'_, RigState> {
        self.0.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, RigState> {
        self.0.borrow_mut()
    }
}

pub struct FakeMedia(Rig);

impl MediaElement for FakeMedia {
    type Source = u32;

    fn source(&self) -> u32 {
        1
    }

    fn set_source(&mut self, track: &Track) -> Result<()> {
        self.0.record(Call::SetSource(track.id.clone()));
        if self.0.state().failing_sources.contains(track.source.as_str()) {
            return Err(PlaybackError::SourceLoad(format!(
                "cannot open {}",
                track.source
            )));
        }
        Ok(())
    }

    fn release(&mut self) {
        self.0.record(Call::Release);
    }

    async fn play(&mut self) -> Result<()> {
        self.0.record(Call::Play);
        if self.0.state().reject_play {
            return Err(PlaybackError::PlaybackStart("NotAllowedError".into()));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.0.record(Call::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.0.record(Call::SetCurrentTime(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.0.record(Call::SetVolume(volume));
    }
}

pub struct FakeAnalysis(Rig);

impl AnalysisBackend for FakeAnalysis {
    type Source = u32;

    fn initialize(&mut self, fft_size: u32) -> Result<usize> {
        self.0.record(Call::Initialize(fft_size));
        if self.0.state().no_analysis {
            return Err(PlaybackError::UnsupportedEnvironment("no AudioContext".into()));
        }
        Ok((fft_size / 2) as usize)
    }

    fn connect(&mut self, _source: &u32) -> Result<()> {
        self.0.record(Call::Connect);
        Ok(())
    }

    fn disconnect(&mut self, _source: &u32) {
        self.0.record(Call::Disconnect);
    }

    fn frequency_data(&mut self, out: &mut [u8]) {
        out.fill(self.0.state().level);
    }

    fn is_suspended(&self) -> bool {
        self.0.state().suspended
    }

    async fn resume(&mut self) -> Result<()> {
        self.0.record(Call::Resume);
        self.0.state_mut().suspended = false;
        Ok(())
    }
}

pub struct FakeFrames(Rig);

impl FrameScheduler for FakeFrames {
    fn request_frame(&mut self) -> Result<FrameToken> {
        let token = {
            let mut state = self.0.state_mut();
            if state.refuse_frames {
                return Err(PlaybackError::Hardware("no display".into()));
            }
            state.next_token += 1;
            FrameToken::new(state.next_token)
        };
        self.0.record(Call::RequestFrame(token));
        Ok(token)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.0.record(Call::CancelFrame(token));
    }
}

// ===== Fixtures =====

pub fn track(id: &str, duration_seconds: f64) -> Track {
    let mut track = Track::new(
        format!("Track {id}"),
        SourceLocator::new(format!("blob:test/{id}")),
        duration_seconds,
    );
    track.id = TrackId::new(id);
    track
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id, 180.0)).collect()
}

static TRACING: Once = Once::new();

/// Route session logs to the test harness output
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("lyra_playback=debug")
            .with_test_writer()
            .try_init();
    });
}
