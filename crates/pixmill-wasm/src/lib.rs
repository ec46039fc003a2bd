//! Pixmill WASM - WebAssembly bindings for Pixmill
//!
//! This crate exposes pixmill-core to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `codec` - Decoding, encoding and target-size compression
//! - `transform` - Resize session, presets, rotation, flips, crop
//! - `adjust` - CSS filter strings, baking, filter presets
//! - `text` - Text overlays
//! - `editor` - The stateful image collection (`JsEditor`)
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor } from '@pixmill/wasm';
//!
//! await init();
//!
//! const editor = new JsEditor();
//! const id = editor.add_file(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
//! const artifact = editor.export(id, 'compressed', { format: 'jpeg', targetSizeKB: 500 });
//! ```

use wasm_bindgen::prelude::*;

mod adjust;
mod codec;
mod editor;
mod text;
mod transform;
mod types;

// Re-export public types
pub use adjust::{bake_effects, css_filter, preset_filter, preset_labels};
pub use codec::{compress_image, decode_image, detect_format, encode_image, JsCompressionResult};
pub use editor::{JsBatchReport, JsEditor, JsExportArtifact};
pub use text::render_text;
pub use transform::{
    apply_crop, apply_orientation, centered_crop, generate_thumbnail, resize_image,
    resize_preset_names, resize_to_fit, JsResizeSession,
};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load).
///
/// Routes panics and `log` records to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Human-readable byte size, e.g. `"1.5 KB"`.
#[wasm_bindgen]
pub fn format_bytes(bytes: f64) -> String {
    pixmill_core::collection::format_bytes(bytes.max(0.0) as u64)
}

/// Percentage saved going from `original` to `output` bytes.
#[wasm_bindgen]
pub fn percent_saved(original: f64, output: f64) -> f64 {
    pixmill_core::collection::percent_saved(original.max(0.0) as usize, output.max(0.0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1536.0), "1.5 KB");
        assert_eq!(format_bytes(-3.0), "0 B");
    }

    #[test]
    fn test_percent_saved() {
        assert!((percent_saved(1000.0, 250.0) - 75.0).abs() < 1e-9);
        assert_eq!(percent_saved(0.0, 10.0), 0.0);
    }
}
