//! WASM bindings for resize, rotation, flips and crop.

use pixmill_core::decode::Dimensions;
use pixmill_core::transform::{
    self, find_preset, CropRatio, CropRect, Orientation, ResizeSession, RESIZE_PRESETS,
};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, js_error, JsDecodedImage};

/// Resize tool state with an aspect lock.
///
/// ```typescript
/// const session = new JsResizeSession(4000, 3000);
/// session.set_width(800); // height becomes 600
/// ```
#[wasm_bindgen]
pub struct JsResizeSession {
    inner: ResizeSession,
}

#[wasm_bindgen]
impl JsResizeSession {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> JsResizeSession {
        Self {
            inner: ResizeSession::new(Dimensions::new(width, height)),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter)]
    pub fn locked(&self) -> bool {
        self.inner.is_locked()
    }

    pub fn set_width(&mut self, width: u32) {
        self.inner.set_width(width);
    }

    pub fn set_height(&mut self, height: u32) {
        self.inner.set_height(height);
    }

    pub fn toggle_lock(&mut self) {
        self.inner.toggle_lock();
    }

    pub fn set_scale_percent(&mut self, percent: f64) {
        self.inner.set_scale_percent(percent);
    }

    /// Apply a named preset (unlocks the aspect ratio).
    pub fn apply_preset(&mut self, name: &str) -> Result<(), JsValue> {
        let preset = find_preset(name).ok_or_else(|| js_error(format!("Unknown preset: {name}")))?;
        self.inner.apply_preset(preset);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// `true` when both sides are positive.
    pub fn is_valid(&self) -> bool {
        self.inner.target().is_ok()
    }
}

/// Names of the built-in resize presets.
#[wasm_bindgen]
pub fn resize_preset_names() -> Vec<String> {
    RESIZE_PRESETS.iter().map(|p| p.name.to_string()).collect()
}

/// Resize to exact dimensions. `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize_image(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    transform::resize_image(&image.to_decoded(), width, height, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

/// Resize so the longest edge is at most `max_edge`.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsDecodedImage,
    max_edge: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    transform::resize_to_fit(&image.to_decoded(), max_edge, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

#[wasm_bindgen]
pub fn generate_thumbnail(image: &JsDecodedImage, size: u32) -> Result<JsDecodedImage, JsValue> {
    transform::generate_thumbnail(&image.to_decoded(), size)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

/// Apply flips then a rotation (degrees, multiple of 90, positive = clockwise).
#[wasm_bindgen]
pub fn apply_orientation(
    image: &JsDecodedImage,
    rotation: i32,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> JsDecodedImage {
    let orientation = Orientation {
        rotation: rotation % 360,
        flip_horizontal,
        flip_vertical,
    };
    JsDecodedImage::from_decoded(transform::apply_orientation(&image.to_decoded(), &orientation))
}

/// Crop with normalized coordinates (0.0 to 1.0).
#[wasm_bindgen]
pub fn apply_crop(
    image: &JsDecodedImage,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> Result<JsDecodedImage, JsValue> {
    let rect = CropRect::new(left, top, width, height);
    rect.validate().map_err(js_error)?;
    Ok(JsDecodedImage::from_decoded(transform::apply_crop(
        &image.to_decoded(),
        &rect,
    )))
}

/// Largest centered crop with `ratio_width:ratio_height`, as
/// `[left, top, width, height]`. A zero side means a free crop.
#[wasm_bindgen]
pub fn centered_crop(
    image_width: u32,
    image_height: u32,
    ratio_width: u32,
    ratio_height: u32,
) -> Vec<f64> {
    let ratio = CropRatio::Custom {
        width: ratio_width,
        height: ratio_height,
    };
    let rect = CropRect::centered(ratio, Dimensions::new(image_width, image_height));
    vec![rect.left, rect.top, rect.width, rect.height]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> JsDecodedImage {
        JsDecodedImage::new(width, height, vec![100u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_session_lock() {
        let mut session = JsResizeSession::new(1920, 1080);
        session.set_width(960);
        assert_eq!(session.height(), 540);
        assert!(session.locked());
        assert!(session.is_valid());
    }

    #[test]
    fn test_session_preset_ok() {
        let mut session = JsResizeSession::new(1920, 1080);
        assert!(session.apply_preset("HD 720p").is_ok());
        assert_eq!((session.width(), session.height()), (1280, 720));
        assert!(!session.locked());
    }

    #[test]
    fn test_preset_names() {
        assert!(resize_preset_names().contains(&"Instagram Square".to_string()));
    }

    #[test]
    fn test_orientation_swaps() {
        let out = apply_orientation(&gray(4, 2), -90, false, true);
        assert_eq!((out.width(), out.height()), (2, 4));
    }

    #[test]
    fn test_crop_and_resize() {
        let cropped = apply_crop(&gray(10, 10), 0.0, 0.0, 0.5, 0.5).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (5, 5));

        let resized = resize_image(&gray(10, 10), 4, 3, 1).unwrap();
        assert_eq!((resized.width(), resized.height()), (4, 3));

        let thumb = generate_thumbnail(&gray(100, 50), 20).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (20, 10));
    }

    #[test]
    fn test_centered_crop() {
        let rect = centered_crop(200, 100, 1, 1);
        assert_eq!(rect.len(), 4);
        assert!((rect[2] - 0.5).abs() < 1e-9);
        assert_eq!(centered_crop(200, 100, 0, 0), vec![0.0, 0.0, 1.0, 1.0]);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_unknown_preset_errors() {
        let mut session = JsResizeSession::new(100, 100);
        assert!(session.apply_preset("Poster").is_err());
    }

    #[wasm_bindgen_test]
    fn test_zero_resize_errors() {
        let img = JsDecodedImage::new(2, 2, vec![0u8; 12]);
        assert!(resize_image(&img, 0, 2, 1).is_err());
    }
}
