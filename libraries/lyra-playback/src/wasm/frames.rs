//! `requestAnimationFrame` frame scheduler

use super::js_message;
use crate::command::{Inbox, SessionMessage};
use crate::error::{PlaybackError, Result};
use crate::host::{FrameScheduler, FrameToken};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct PendingFrame {
    token: FrameToken,
    handle: i32,
    // Kept alive until the browser calls it or the request is cancelled
    _callback: Closure<dyn FnMut(f64)>,
}

/// Delivers animation frames to a session inbox
pub struct AnimationFrames {
    window: Window,
    inbox: Inbox,
    next_token: u64,
    pending: Option<PendingFrame>,
}

impl AnimationFrames {
    pub fn new(inbox: &Inbox) -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| PlaybackError::UnsupportedEnvironment("no window".into()))?;
        Ok(Self {
            window,
            inbox: inbox.clone(),
            next_token: 0,
            pending: None,
        })
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) -> Result<FrameToken> {
        self.next_token += 1;
        let token = FrameToken::new(self.next_token);

        let inbox = self.inbox.clone();
        let callback: Closure<dyn FnMut(f64)> = Closure::once(move |_timestamp: f64| {
            let _ = inbox.send(SessionMessage::Frame(token));
        });

        let handle = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| PlaybackError::Hardware(js_message(&e)))?;
        self.pending = Some(PendingFrame {
            token,
            handle,
            _callback: callback,
        });

        Ok(token)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if pending.token != token {
            self.pending = Some(pending);
            return;
        }
        if let Err(e) = self.window.cancel_animation_frame(pending.handle) {
            warn!(error = %js_message(&e), "cancelAnimationFrame failed");
        }
    }
}
