//! Spectrum sampler
//!
//! Wraps an [`AnalysisBackend`] and keeps exactly one source connected to it.

use crate::host::AnalysisBackend;
use tracing::{debug, warn};

/// Whether the analysis context could be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerStatus {
    /// Nothing attached yet
    Uninitialized,
    /// Context built, bins available once a source is attached
    Ready,
    /// The host cannot analyze audio; sampling yields nothing
    Unsupported,
}

/// Produces frequency-bin snapshots of the attached source
#[derive(Debug)]
pub struct SpectrumSampler<A: AnalysisBackend> {
    backend: A,
    fft_size: u32,
    status: AnalyzerStatus,
    attached: Option<A::Source>,
    bins: Vec<u8>,
}

impl<A: AnalysisBackend> SpectrumSampler<A> {
    /// Create a sampler; the analysis context is built on first attach
    pub fn new(backend: A, fft_size: u32) -> Self {
        Self {
            backend,
            fft_size,
            status: AnalyzerStatus::Uninitialized,
            attached: None,
            bins: Vec::new(),
        }
    }

    /// Connect `source` as the analysis input
    ///
    /// Re-attaching the current source does nothing. Any other previously
    /// attached source is disconnected first. Failures are logged and leave
    /// the sampler producing nothing.
    pub fn attach(&mut self, source: &A::Source) {
        if !self.ensure_initialized() {
            return;
        }

        if self.attached.as_ref() == Some(source) {
            return;
        }

        if let Some(previous) = self.attached.take() {
            debug!(?previous, "Disconnecting previous analysis source");
            self.backend.disconnect(&previous);
        }

        match self.backend.connect(source) {
            Ok(()) => {
                debug!(?source, "Analysis source attached");
                self.attached = Some(source.clone());
            }
            Err(e) => warn!(error = %e, "Failed to connect analysis source"),
        }
    }

    /// Disconnect the attached source, if any
    pub fn detach(&mut self) {
        if let Some(previous) = self.attached.take() {
            self.backend.disconnect(&previous);
        }
    }

    /// Current magnitudes, `fft_size / 2` values in `0..=255`
    ///
    /// `None` when nothing is attached or analysis is unsupported.
    pub fn sample(&mut self) -> Option<&[u8]> {
        if self.status != AnalyzerStatus::Ready || self.attached.is_none() {
            return None;
        }
        self.backend.frequency_data(&mut self.bins);
        Some(&self.bins)
    }

    /// Resume a suspended hardware context
    ///
    /// Call after a user gesture and before the first sample; failures are
    /// logged and swallowed.
    pub async fn resume(&mut self) {
        if self.status != AnalyzerStatus::Ready || !self.backend.is_suspended() {
            return;
        }
        if let Err(e) = self.backend.resume().await {
            warn!(error = %e, "Failed to resume audio context");
        }
    }

    pub fn status(&self) -> AnalyzerStatus {
        self.status
    }

    pub fn fft_size(&self) -> u32 {
        self.fft_size
    }

    /// Whether a source is currently connected
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    fn ensure_initialized(&mut self) -> bool {
        match self.status {
            AnalyzerStatus::Ready => true,
            AnalyzerStatus::Unsupported => false,
            AnalyzerStatus::Uninitialized => match self.backend.initialize(self.fft_size) {
                Ok(bin_count) => {
                    debug!(fft_size = self.fft_size, bin_count, "Analysis context ready");
                    self.bins = vec![0; bin_count];
                    self.status = AnalyzerStatus::Ready;
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Audio analysis unavailable, visualizer disabled");
                    self.status = AnalyzerStatus::Unsupported;
                    false
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PlaybackError, Result};

    #[derive(Debug, Default)]
    struct FakeAnalyser {
        fail_init: bool,
        init_calls: usize,
        connected: Vec<u32>,
        log: Vec<String>,
        suspended: bool,
        fill: u8,
    }

    impl AnalysisBackend for FakeAnalyser {
        type Source = u32;

        fn initialize(&mut self, fft_size: u32) -> Result<usize> {
            self.init_calls += 1;
            if self.fail_init {
                return Err(PlaybackError::UnsupportedEnvironment("no web audio".into()));
            }
            Ok((fft_size / 2) as usize)
        }

        fn connect(&mut self, source: &u32) -> Result<()> {
            self.log.push(format!("connect {source}"));
            self.connected.push(*source);
            Ok(())
        }

        fn disconnect(&mut self, source: &u32) {
            self.log.push(format!("disconnect {source}"));
            self.connected.retain(|s| s != source);
        }

        fn frequency_data(&mut self, out: &mut [u8]) {
            out.fill(self.fill);
        }

        fn is_suspended(&self) -> bool {
            self.suspended
        }

        async fn resume(&mut self) -> Result<()> {
            self.suspended = false;
            Ok(())
        }
    }

    #[test]
    fn sample_before_attach_is_none() {
        let mut sampler = SpectrumSampler::new(FakeAnalyser::default(), 256);
        assert!(sampler.sample().is_none());
    }

    #[test]
    fn sample_has_half_fft_bins() {
        let backend = FakeAnalyser {
            fill: 200,
            ..Default::default()
        };
        let mut sampler = SpectrumSampler::new(backend, 256);
        sampler.attach(&1);

        let bins = sampler.sample().unwrap();
        assert_eq!(bins.len(), 128);
        assert!(bins.iter().all(|b| *b == 200));
    }

    #[test]
    fn reattach_disconnects_previous_first() {
        let mut sampler = SpectrumSampler::new(FakeAnalyser::default(), 64);
        sampler.attach(&1);
        sampler.attach(&1);
        sampler.attach(&2);

        let backend = sampler.backend();
        assert_eq!(backend.init_calls, 1);
        assert_eq!(backend.log, vec!["connect 1", "disconnect 1", "connect 2"]);
        assert_eq!(backend.connected, vec![2]);
    }

    #[test]
    fn unsupported_host_degrades_silently() {
        let backend = FakeAnalyser {
            fail_init: true,
            ..Default::default()
        };
        let mut sampler = SpectrumSampler::new(backend, 256);
        sampler.attach(&1);
        sampler.attach(&2);

        assert_eq!(sampler.status(), AnalyzerStatus::Unsupported);
        assert!(sampler.sample().is_none());
        // No retry after the first failure
        assert_eq!(sampler.backend().init_calls, 1);
    }

    #[test]
    fn detach_disconnects() {
        let mut sampler = SpectrumSampler::new(FakeAnalyser::default(), 64);
        sampler.attach(&7);
        sampler.detach();

        assert!(!sampler.is_attached());
        assert!(sampler.backend().connected.is_empty());
        assert!(sampler.sample().is_none());
    }
}
