//! Render loop scheduler
//!
//! Keeps at most one frame request outstanding. The session drives the
//! per-frame work; this type only decides whether a delivered frame is the
//! one it is waiting for.

use crate::host::{FrameScheduler, FrameToken};
use tracing::warn;

/// Cooperative render loop over a host frame scheduler
#[derive(Debug)]
pub struct RenderLoop<F> {
    scheduler: F,
    pending: Option<FrameToken>,
}

impl<F: FrameScheduler> RenderLoop<F> {
    pub fn new(scheduler: F) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    /// Request a frame unless one is already pending
    ///
    /// A refused request leaves nothing pending, so the next `start` retries.
    pub fn start(&mut self) {
        if self.pending.is_some() {
            return;
        }
        match self.scheduler.request_frame() {
            Ok(token) => self.pending = Some(token),
            Err(e) => warn!(error = %e, "Frame request failed, render loop idle"),
        }
    }

    /// Cancel the pending request, if any
    pub fn stop(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
    }

    /// Accept a delivered frame
    ///
    /// Returns true when `token` is the pending request, which is then
    /// consumed. Stale tokens return false and change nothing.
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Whether a frame request is outstanding
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PlaybackError, Result};

    #[derive(Debug, Default)]
    struct CountingFrames {
        next: u64,
        refuse: bool,
        requested: Vec<FrameToken>,
        cancelled: Vec<FrameToken>,
    }

    impl FrameScheduler for CountingFrames {
        fn request_frame(&mut self) -> Result<FrameToken> {
            if self.refuse {
                return Err(PlaybackError::Hardware("no display".into()));
            }
            self.next += 1;
            let token = FrameToken::new(self.next);
            self.requested.push(token);
            Ok(token)
        }

        fn cancel_frame(&mut self, token: FrameToken) {
            self.cancelled.push(token);
        }
    }

    #[test]
    fn double_start_requests_once() {
        let mut render = RenderLoop::new(CountingFrames::default());
        render.start();
        render.start();
        assert_eq!(render.scheduler().requested.len(), 1);
    }

    #[test]
    fn stop_cancels_and_is_idempotent() {
        let mut render = RenderLoop::new(CountingFrames::default());
        render.start();
        render.stop();
        render.stop();

        assert!(!render.is_running());
        assert_eq!(render.scheduler().cancelled, vec![FrameToken::new(1)]);
    }

    #[test]
    fn stale_token_is_rejected() {
        let mut render = RenderLoop::new(CountingFrames::default());
        render.start();
        render.stop();
        render.start();

        assert!(!render.on_frame(FrameToken::new(1)));
        assert!(render.is_running());
        assert!(render.on_frame(FrameToken::new(2)));
        assert!(!render.is_running());
    }

    #[test]
    fn refused_request_leaves_loop_idle_and_retries() {
        let mut render = RenderLoop::new(CountingFrames {
            refuse: true,
            ..Default::default()
        });
        render.start();
        assert!(!render.is_running());

        render.stop();
        assert!(render.scheduler().cancelled.is_empty());

        render.scheduler.refuse = false;
        render.start();
        assert!(render.is_running());
        assert!(render.on_frame(FrameToken::new(1)));
    }
}
