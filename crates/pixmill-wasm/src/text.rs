//! Text overlay bindings.

use pixmill_core::text::{self, TextOverlaySpec};
use wasm_bindgen::prelude::*;

use crate::types::{js_error, JsDecodedImage};

pub(crate) fn spec_from_js(value: JsValue) -> Result<TextOverlaySpec, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(format!("Invalid text overlay: {e}")))
}

/// Draw a text overlay described by a `TextOverlaySpec`-shaped object.
///
/// ```typescript
/// const out = render_text(image, { text: '© 2024', fontSizePx: 32, color: '#ffffffcc',
///   align: 'right', positionXPercent: 95, positionYPercent: 95 });
/// ```
#[wasm_bindgen]
pub fn render_text(image: &JsDecodedImage, spec: JsValue) -> Result<JsDecodedImage, JsValue> {
    let spec = spec_from_js(spec)?;
    text::render_text_overlay(&image.to_decoded(), &spec)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}
