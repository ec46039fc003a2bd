//! Decode, encode and target-size compression bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, compress_image } from '@pixmill/wasm';
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const result = compress_image(image, { format: 'webp', quality: 80, targetSizeKB: 200 });
//! if (!result.budget_met) console.warn('Could not reach 200 KB');
//! ```

use pixmill_core::compress::{self, CompressionOutcome, CompressionSettings, SearchOptions};
use pixmill_core::encode::OutputFormat;
use pixmill_core::{decode, encode, ImageCodec};
use wasm_bindgen::prelude::*;

use crate::types::{format_from_name, js_error, JsDecodedImage};

/// Decode JPEG, PNG or WebP bytes (EXIF orientation applied).
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

/// Sniff the format of `bytes`: `"jpeg"`, `"png"`, `"webp"` or `undefined`.
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> Option<String> {
    decode::detect_format(bytes).map(|format| {
        match format {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
        .to_string()
    })
}

/// Encode an image. `quality` (1-100) is ignored for PNG.
#[wasm_bindgen]
pub fn encode_image(image: &JsDecodedImage, format: &str, quality: u8) -> Result<Vec<u8>, JsValue> {
    let format =
        format_from_name(format).ok_or_else(|| js_error(format!("Unknown format: {format}")))?;
    let decoded = image.to_decoded();
    encode::encode(&decoded.pixels, decoded.width, decoded.height, format, quality)
        .map(|e| e.bytes)
        .map_err(js_error)
}

/// Result of a compression: bytes plus how they were obtained.
#[wasm_bindgen]
pub struct JsCompressionResult {
    outcome: CompressionOutcome,
}

#[wasm_bindgen]
impl JsCompressionResult {
    pub fn bytes(&self) -> Vec<u8> {
        self.outcome.encoded.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.outcome.byte_length()
    }

    /// Codec quality used, or `undefined` for PNG.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> Option<u8> {
        self.outcome.quality()
    }

    /// `false` when a target size was requested and could not be reached.
    #[wasm_bindgen(getter)]
    pub fn budget_met(&self) -> bool {
        self.outcome.budget_met
    }

    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> u32 {
        self.outcome.iterations
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.outcome.encoded.format.mime_type().to_string()
    }
}

impl JsCompressionResult {
    pub(crate) fn new(outcome: CompressionOutcome) -> Self {
        Self { outcome }
    }
}

/// Compress an image with `{ quality, format, targetSizeKB }` settings.
#[wasm_bindgen]
pub fn compress_image(
    image: &JsDecodedImage,
    settings: JsValue,
) -> Result<JsCompressionResult, JsValue> {
    let settings: CompressionSettings = if settings.is_undefined() || settings.is_null() {
        CompressionSettings::default()
    } else {
        serde_wasm_bindgen::from_value(settings)
            .map_err(|e| js_error(format!("Invalid compression settings: {e}")))?
    };

    compress_decoded(image, &settings).map_err(js_error)
}

pub(crate) fn compress_decoded(
    image: &JsDecodedImage,
    settings: &CompressionSettings,
) -> Result<JsCompressionResult, compress::CompressError> {
    let decoded = image.to_decoded();
    compress::compress_image(&ImageCodec, &decoded, settings, &SearchOptions::default())
        .map(JsCompressionResult::new)
}
