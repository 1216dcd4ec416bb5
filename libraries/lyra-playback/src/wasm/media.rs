//! `HTMLAudioElement` media element

use super::js_message;
use crate::command::{Inbox, SessionMessage};
use crate::error::{PlaybackError, Result};
use crate::host::{MediaElement, MediaEvent};
use lyra_core::Track;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, Event, HtmlAudioElement, Url};

/// Object URLs minted for one-off playback
///
/// The media element revokes a URL from this set when it lets go of it.
/// URLs minted for library tracks are never registered here and stay valid.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrls(Rc<RefCell<HashSet<String>>>);

impl ObjectUrls {
    /// Mint a transient object URL for `blob`
    pub fn create(&self, blob: &Blob) -> Result<String> {
        let url = Url::create_object_url_with_blob(blob)
            .map_err(|e| PlaybackError::SourceLoad(js_message(&e)))?;
        self.0.borrow_mut().insert(url.clone());
        Ok(url)
    }

    /// Revoke `url` if it was minted here; returns whether it was
    pub fn revoke(&self, url: &str) -> bool {
        if !self.0.borrow_mut().remove(url) {
            return false;
        }
        if let Err(e) = Url::revoke_object_url(url) {
            warn!(url, error = %js_message(&e), "Failed to revoke object URL");
        }
        true
    }
}

type Listener = Closure<dyn FnMut(Event)>;

/// Media element backed by a detached `<audio>` element
pub struct HtmlAudio {
    element: HtmlAudioElement,
    object_urls: ObjectUrls,
    listeners: Vec<(&'static str, Listener)>,
}

impl HtmlAudio {
    /// Create the element and forward its events to `inbox`
    pub fn new(inbox: &Inbox, object_urls: ObjectUrls) -> Result<Self> {
        let element =
            HtmlAudioElement::new().map_err(|e| PlaybackError::Hardware(js_message(&e)))?;
        // Cross-origin sources are opaque to the analyser without CORS
        element.set_cross_origin(Some("anonymous"));
        element.set_preload("metadata");

        let mut audio = Self {
            element,
            object_urls,
            listeners: Vec::new(),
        };

        audio.listen("loadedmetadata", inbox, |el| {
            Some(MediaEvent::MetadataLoaded {
                duration: el.duration(),
            })
        })?;
        audio.listen("timeupdate", inbox, |el| {
            Some(MediaEvent::PositionChanged {
                position: el.current_time(),
            })
        })?;
        audio.listen("ended", inbox, |_| Some(MediaEvent::Ended))?;
        audio.listen("error", inbox, |el| {
            // Clearing `src` on release can fire an error with nothing loaded
            if !el.has_attribute("src") {
                return None;
            }
            let code = el.error().map_or(0, |e| e.code());
            Some(MediaEvent::Error {
                message: media_error_message(code).to_string(),
            })
        })?;

        Ok(audio)
    }

    fn listen<F>(&mut self, name: &'static str, inbox: &Inbox, map: F) -> Result<()>
    where
        F: Fn(&HtmlAudioElement) -> Option<MediaEvent> + 'static,
    {
        let element = self.element.clone();
        let inbox = inbox.clone();
        let listener = Listener::new(move |_event: Event| {
            if let Some(event) = map(&element) {
                // Closed inbox means the session is gone
                let _ = inbox.send(SessionMessage::Media(event));
            }
        });

        self.element
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            .map_err(|e| PlaybackError::Hardware(js_message(&e)))?;
        self.listeners.push((name, listener));
        Ok(())
    }
}

impl Drop for HtmlAudio {
    fn drop(&mut self) {
        for (name, listener) in &self.listeners {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

impl MediaElement for HtmlAudio {
    type Source = HtmlAudioElement;

    fn source(&self) -> HtmlAudioElement {
        self.element.clone()
    }

    fn set_source(&mut self, track: &Track) -> Result<()> {
        let src = track.source.as_str();
        if src.is_empty() {
            return Err(PlaybackError::SourceLoad(format!(
                "track {} has no source",
                track.id
            )));
        }
        self.element.set_src(src);
        self.element.load();
        Ok(())
    }

    fn release(&mut self) {
        let src = self.element.src();
        if let Err(e) = self.element.remove_attribute("src") {
            warn!(error = %js_message(&e), "Failed to clear audio source");
        }
        self.element.load();
        if self.object_urls.revoke(&src) {
            debug!(url = %src, "Revoked transient object URL");
        }
    }

    async fn play(&mut self) -> Result<()> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::PlaybackStart(js_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| PlaybackError::PlaybackStart(js_message(&e)))
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            warn!(error = %js_message(&e), "Failed to pause audio element");
        }
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume);
    }
}

fn media_error_message(code: u16) -> &'static str {
    match code {
        1 => "playback aborted",
        2 => "network error while fetching audio",
        3 => "audio could not be decoded",
        4 => "audio format not supported",
        _ => "unknown media error",
    }
}
