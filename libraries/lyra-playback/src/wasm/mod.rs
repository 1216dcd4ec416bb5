//! WASM bindings for lyra-playback
//!
//! Browser implementations of the hardware seams plus the `WebPlayer`
//! facade exported to JavaScript.

pub mod analysis;
pub mod frames;
pub mod logging;
pub mod media;
pub mod player;
pub mod storage;

pub use analysis::WebAudioAnalysis;
pub use frames::AnimationFrames;
pub use media::{HtmlAudio, ObjectUrls};
pub use player::WebPlayer;
pub use storage::LocalStorage;

use wasm_bindgen::JsValue;

/// Best-effort text for a thrown JavaScript value
pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Convert a Rust error into a JavaScript `Error`
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
