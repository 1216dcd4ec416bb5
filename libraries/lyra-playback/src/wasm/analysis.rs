//! Web Audio analyser backend

use super::js_message;
use crate::error::{PlaybackError, Result};
use crate::host::AnalysisBackend;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AnalyserNode, AudioContext, AudioContextState, HtmlAudioElement, MediaElementAudioSourceNode,
};

/// `AudioContext` + `AnalyserNode` wired to the speakers
///
/// A media element can feed only one `MediaElementAudioSourceNode` per
/// context, so source nodes are created once per element and reused.
#[derive(Default)]
pub struct WebAudioAnalysis {
    graph: Option<Graph>,
    sources: Vec<(HtmlAudioElement, MediaElementAudioSourceNode)>,
}

struct Graph {
    context: AudioContext,
    analyser: AnalyserNode,
}

impl WebAudioAnalysis {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_initialized() -> PlaybackError {
    PlaybackError::UnsupportedEnvironment("analyser not initialized".into())
}

impl AnalysisBackend for WebAudioAnalysis {
    type Source = HtmlAudioElement;

    fn initialize(&mut self, fft_size: u32) -> Result<usize> {
        let unsupported =
            |e: wasm_bindgen::JsValue| PlaybackError::UnsupportedEnvironment(js_message(&e));

        let context = AudioContext::new().map_err(unsupported)?;
        let analyser = context.create_analyser().map_err(unsupported)?;
        analyser.set_fft_size(fft_size);
        analyser
            .connect_with_audio_node(&context.destination())
            .map_err(unsupported)?;

        let bins = analyser.frequency_bin_count() as usize;
        self.graph = Some(Graph { context, analyser });
        Ok(bins)
    }

    fn connect(&mut self, source: &HtmlAudioElement) -> Result<()> {
        let graph = self.graph.as_ref().ok_or_else(not_initialized)?;
        let hardware = |e: wasm_bindgen::JsValue| PlaybackError::Hardware(js_message(&e));

        let node = match self.sources.iter().find(|(el, _)| el == source) {
            Some((_, node)) => node.clone(),
            None => {
                let node = graph
                    .context
                    .create_media_element_source(source)
                    .map_err(hardware)?;
                self.sources.push((source.clone(), node.clone()));
                node
            }
        };

        node.connect_with_audio_node(&graph.analyser)
            .map(|_| ())
            .map_err(hardware)
    }

    fn disconnect(&mut self, source: &HtmlAudioElement) {
        let Some(graph) = self.graph.as_ref() else {
            return;
        };
        if let Some((_, node)) = self.sources.iter().find(|(el, _)| el == source) {
            if let Err(e) = node.disconnect_with_audio_node(&graph.analyser) {
                tracing::warn!(error = %js_message(&e), "Failed to disconnect analysis source");
            }
        }
    }

    fn frequency_data(&mut self, out: &mut [u8]) {
        if let Some(graph) = &self.graph {
            graph.analyser.get_byte_frequency_data(out);
        }
    }

    fn is_suspended(&self) -> bool {
        self.graph
            .as_ref()
            .is_some_and(|g| g.context.state() == AudioContextState::Suspended)
    }

    async fn resume(&mut self) -> Result<()> {
        let promise = self
            .graph
            .as_ref()
            .ok_or_else(not_initialized)?
            .context
            .resume()
            .map_err(|e| PlaybackError::Hardware(js_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| PlaybackError::Hardware(js_message(&e)))
    }
}
