//! JavaScript-facing player

use super::analysis::WebAudioAnalysis;
use super::frames::AnimationFrames;
use super::media::{HtmlAudio, ObjectUrls};
use super::storage::LocalStorage;
use super::{logging, to_js_error};
use crate::command::{inbox, PlayerCommand, PlayerHandle};
use crate::config::PlaybackConfig;
use crate::events::PlaybackEvent;
use crate::queue::Queue;
use crate::session::PlaybackSession;
use crate::types::RepeatMode;
use js_sys::Function;
use lyra_core::{format, Library, PlayContext, PlaylistId, Track, TrackCatalog, TrackId};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::File;

type Listeners = Rc<RefCell<Vec<Function>>>;

/// Music player for the browser
///
/// Owns a playback session running on the page's event loop and the
/// `localStorage` library. Events are delivered to callbacks registered with
/// `onEvent`.
#[wasm_bindgen]
pub struct WebPlayer {
    player: PlayerHandle,
    library: Rc<Library<LocalStorage>>,
    object_urls: ObjectUrls,
    listeners: Listeners,
}

#[wasm_bindgen]
impl WebPlayer {
    /// Create a player; `options` is an optional `PlaybackConfig` object
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WebPlayer, JsValue> {
        logging::init("info");

        let config: PlaybackConfig = if options.is_undefined() || options.is_null() {
            PlaybackConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        config.validate().map_err(to_js_error)?;

        let (tx, rx) = inbox();
        let object_urls = ObjectUrls::default();
        let media = HtmlAudio::new(&tx, object_urls.clone()).map_err(to_js_error)?;
        let frames = AnimationFrames::new(&tx).map_err(to_js_error)?;
        let session = PlaybackSession::new(&config, media, WebAudioAnalysis::new(), frames);
        let player = session.handle(tx);

        let store = LocalStorage::new().map_err(to_js_error)?;
        let library = Rc::new(Library::new(store).with_recent_capacity(config.recent_capacity));
        let listeners = Listeners::default();

        spawn_local(session.run(rx));
        spawn_local(forward_events(
            player.subscribe(),
            Rc::clone(&library),
            Rc::clone(&listeners),
        ));

        info!(fft_size = config.fft_size, bar_count = config.bar_count, "Web player ready");
        Ok(Self {
            player,
            library,
            object_urls,
            listeners,
        })
    }

    // ===== Playback Control =====

    pub fn play(&self) -> Result<(), JsValue> {
        self.send(PlayerCommand::Play)
    }

    pub fn pause(&self) -> Result<(), JsValue> {
        self.send(PlayerCommand::Pause)
    }

    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&self) -> Result<(), JsValue> {
        self.send(PlayerCommand::TogglePlayback)
    }

    pub fn seek(&self, seconds: f64) -> Result<(), JsValue> {
        self.send(PlayerCommand::Seek(seconds))
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) -> Result<(), JsValue> {
        self.send(PlayerCommand::SetVolume(volume))
    }

    pub fn next(&self) -> Result<(), JsValue> {
        self.send(PlayerCommand::Next)
    }

    pub fn previous(&self) -> Result<(), JsValue> {
        self.send(PlayerCommand::Previous)
    }

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) -> Result<(), JsValue> {
        self.send(PlayerCommand::ToggleShuffle)
    }

    #[wasm_bindgen(js_name = cycleRepeatMode)]
    pub fn cycle_repeat_mode(&self) -> Result<(), JsValue> {
        self.send(PlayerCommand::CycleRepeatMode)
    }

    /// Set repeat mode: `"none"`, `"all"` or `"one"`
    #[wasm_bindgen(js_name = setRepeatMode)]
    pub fn set_repeat_mode(&self, mode: JsValue) -> Result<(), JsValue> {
        let mode: RepeatMode = serde_wasm_bindgen::from_value(mode)?;
        self.send(PlayerCommand::SetRepeatMode(mode))
    }

    /// Play a library context, starting at `start_track_id` when given
    ///
    /// `context` is `{ type: "library" }`, `{ type: "recentlyPlayed" }` or
    /// `{ type: "playlist", id }`.
    #[wasm_bindgen(js_name = playContext)]
    pub fn play_context(
        &self,
        context: JsValue,
        start_track_id: Option<String>,
    ) -> Result<(), JsValue> {
        let context: PlayContext = serde_wasm_bindgen::from_value(context)?;
        let start = start_track_id.map(TrackId::new);
        let queue =
            Queue::from_context(&*self.library, &context, start.as_ref()).map_err(to_js_error)?;
        self.send(PlayerCommand::PlayQueue(queue))
    }

    /// Play a file without adding it to the library
    ///
    /// Its object URL is revoked once the player moves on.
    #[wasm_bindgen(js_name = playFile)]
    pub fn play_file(&self, file: File) -> Result<(), JsValue> {
        let url = self.object_urls.create(&file).map_err(to_js_error)?;
        let track = Track::from_file_name(&file.name(), url, 0.0);
        self.send(PlayerCommand::PlayQueue(Queue::single(track)))
    }

    // ===== State =====

    /// Latest transport snapshot
    #[wasm_bindgen(js_name = transportState)]
    pub fn transport_state(&self) -> Result<JsValue, JsValue> {
        to_value(&self.player.transport_state())
    }

    /// Latest visualizer bars as a `Float32Array`
    #[wasm_bindgen(js_name = visualizerBars)]
    pub fn visualizer_bars(&self) -> Vec<f32> {
        self.player.visualizer_bars().to_vec()
    }

    /// Register a callback receiving every playback event
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        self.listeners.borrow_mut().push(callback);
    }

    /// Release the audio hardware; the player is unusable afterwards
    pub fn dispose(&self) -> Result<(), JsValue> {
        self.listeners.borrow_mut().clear();
        self.player.shutdown().map_err(to_js_error)
    }

    // ===== Library =====

    /// Add a file to the library; returns the stored track
    #[wasm_bindgen(js_name = addFile)]
    pub fn add_file(&self, file: File, duration_seconds: f64) -> Result<JsValue, JsValue> {
        let url = web_sys::Url::create_object_url_with_blob(&file)?;
        let track = Track::from_file_name(&file.name(), url, duration_seconds);
        self.library.add_track(track.clone()).map_err(to_js_error)?;
        to_value(&track)
    }

    pub fn tracks(&self) -> Result<JsValue, JsValue> {
        to_value(&self.library.load_tracks().map_err(to_js_error)?)
    }

    #[wasm_bindgen(js_name = updateTrack)]
    pub fn update_track(&self, id: String, title: String, artist: String) -> Result<JsValue, JsValue> {
        let track = self
            .library
            .update_track_details(&TrackId::new(id), title, artist)
            .map_err(to_js_error)?;
        to_value(&track)
    }

    #[wasm_bindgen(js_name = removeTrack)]
    pub fn remove_track(&self, id: String) -> Result<(), JsValue> {
        self.library
            .remove_track(&TrackId::new(id))
            .map(|_| ())
            .map_err(to_js_error)
    }

    pub fn playlists(&self) -> Result<JsValue, JsValue> {
        to_value(&self.library.playlists().map_err(to_js_error)?)
    }

    #[wasm_bindgen(js_name = createPlaylist)]
    pub fn create_playlist(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let playlist = self
            .library
            .create_playlist(&name, description.as_deref())
            .map_err(to_js_error)?;
        to_value(&playlist)
    }

    #[wasm_bindgen(js_name = renamePlaylist)]
    pub fn rename_playlist(&self, id: String, name: String) -> Result<JsValue, JsValue> {
        let playlist = self
            .library
            .rename_playlist(&PlaylistId::new(id), &name)
            .map_err(to_js_error)?;
        to_value(&playlist)
    }

    #[wasm_bindgen(js_name = deletePlaylist)]
    pub fn delete_playlist(&self, id: String) -> Result<(), JsValue> {
        self.library
            .delete_playlist(&PlaylistId::new(id))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = addToPlaylist)]
    pub fn add_to_playlist(&self, playlist_id: String, track_id: String) -> Result<JsValue, JsValue> {
        let playlist = self
            .library
            .add_to_playlist(&PlaylistId::new(playlist_id), &TrackId::new(track_id))
            .map_err(to_js_error)?;
        to_value(&playlist)
    }

    #[wasm_bindgen(js_name = removeFromPlaylist)]
    pub fn remove_from_playlist(
        &self,
        playlist_id: String,
        track_id: String,
    ) -> Result<JsValue, JsValue> {
        let playlist = self
            .library
            .remove_from_playlist(&PlaylistId::new(playlist_id), &TrackId::new(track_id))
            .map_err(to_js_error)?;
        to_value(&playlist)
    }

    /// Recently played tracks, most recent first
    #[wasm_bindgen(js_name = recentlyPlayed)]
    pub fn recently_played(&self) -> Result<JsValue, JsValue> {
        let tracks = self
            .library
            .tracks_for(&PlayContext::RecentlyPlayed)
            .map_err(to_js_error)?;
        to_value(&tracks)
    }

    fn send(&self, command: PlayerCommand) -> Result<(), JsValue> {
        self.player.send(command).map_err(to_js_error)
    }
}

/// Format a position as `m:ss`
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time(seconds: f64) -> String {
    format::format_time(seconds)
}

/// Format a length as `h:mm:ss` or `m:ss`
#[wasm_bindgen(js_name = formatDuration)]
pub fn format_duration(seconds: f64) -> String {
    format::format_duration(seconds)
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(Into::into)
}

/// Record plays in the library and fan events out to JavaScript callbacks
async fn forward_events(
    mut events: broadcast::Receiver<PlaybackEvent>,
    library: Rc<Library<LocalStorage>>,
    listeners: Listeners,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event forwarder lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        if let PlaybackEvent::TrackChanged { track_id, .. } = &event {
            if let Err(e) = library.record_play(track_id) {
                warn!(error = %e, "Failed to record play");
            }
        }

        let value = match to_value(&event) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %super::js_message(&e), "Failed to serialize event");
                continue;
            }
        };
        // Cloned so a callback may register another listener
        let callbacks: Vec<Function> = listeners.borrow().clone();
        for callback in callbacks {
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                warn!(error = %super::js_message(&e), "Event callback threw");
            }
        }
    }
}
