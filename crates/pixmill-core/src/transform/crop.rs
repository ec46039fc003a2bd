//! Cropping with normalized coordinates and aspect-ratio presets.
//!
//! Crop rectangles are stored as fractions (0.0 to 1.0) of the image they
//! apply to, so they stay valid regardless of pixel size.
//!
//! # Coordinate System
//!
//! - (0.0, 0.0) = top-left corner
//! - (1.0, 1.0) = bottom-right corner

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::decode::{DecodedImage, Dimensions};

/// Aspect-ratio constraint offered by the crop tool.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CropRatio {
    /// No constraint.
    #[default]
    Free,
    Square,
    FourThree,
    ThreeTwo,
    SixteenNine,
    NineSixteen,
    Custom { width: u32, height: u32 },
}

impl CropRatio {
    /// Width over height, or `None` for a free crop.
    pub fn ratio(self) -> Option<f64> {
        match self {
            CropRatio::Free => None,
            CropRatio::Square => Some(1.0),
            CropRatio::FourThree => Some(4.0 / 3.0),
            CropRatio::ThreeTwo => Some(3.0 / 2.0),
            CropRatio::SixteenNine => Some(16.0 / 9.0),
            CropRatio::NineSixteen => Some(9.0 / 16.0),
            CropRatio::Custom { width, height } if width > 0 && height > 0 => {
                Some(width as f64 / height as f64)
            }
            CropRatio::Custom { .. } => None,
        }
    }
}

/// Normalized crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self::full()
    }
}

impl CropRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The whole image.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn is_full(&self) -> bool {
        self.left <= 0.0 && self.top <= 0.0 && self.width >= 1.0 && self.height >= 1.0
    }

    /// Largest rectangle with `ratio` centered in an image of `dims`.
    pub fn centered(ratio: CropRatio, dims: Dimensions) -> Self {
        let Some(target) = ratio.ratio() else {
            return Self::full();
        };
        let image_ratio = dims.aspect_ratio();

        let (width, height) = if image_ratio > target {
            (target / image_ratio, 1.0)
        } else {
            (1.0, image_ratio / target)
        };
        Self::new((1.0 - width) / 2.0, (1.0 - height) / 2.0, width, height)
    }

    pub fn validate(&self) -> Result<(), TransformError> {
        let finite = [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(TransformError::InvalidCrop);
        }
        Ok(())
    }

    /// Pixel rectangle `(left, top, width, height)` inside `dims`.
    ///
    /// Coordinates beyond the image are clamped and the result is at least
    /// 1x1.
    pub fn to_pixels(&self, dims: Dimensions) -> (u32, u32, u32, u32) {
        if self.is_full() {
            return (0, 0, dims.width, dims.height);
        }

        let src_w = dims.width as f64;
        let src_h = dims.height as f64;

        let px_left = (self.left.clamp(0.0, 1.0) * src_w).round() as u32;
        let px_top = (self.top.clamp(0.0, 1.0) * src_h).round() as u32;
        let px_width = (self.width.clamp(0.0, 1.0) * src_w).round() as u32;
        let px_height = (self.height.clamp(0.0, 1.0) * src_h).round() as u32;

        let px_left = px_left.min(dims.width.saturating_sub(1));
        let px_top = px_top.min(dims.height.saturating_sub(1));
        let px_right = (px_left + px_width).min(dims.width);
        let px_bottom = (px_top + px_height).min(dims.height);

        let out_width = px_right.saturating_sub(px_left).max(1);
        let out_height = px_bottom.saturating_sub(px_top).max(1);

        (px_left, px_top, out_width, out_height)
    }

    /// Output dimensions of this crop on an image of `dims`.
    pub fn output_dimensions(&self, dims: Dimensions) -> Dimensions {
        let (_, _, w, h) = self.to_pixels(dims);
        Dimensions::new(w, h)
    }
}

/// Copy the region described by `rect` into a new image.
///
/// # Example
///
/// ```
/// use pixmill_core::decode::DecodedImage;
/// use pixmill_core::transform::{apply_crop, CropRect};
///
/// let image = DecodedImage::new(100, 100, vec![128u8; 100 * 100 * 3]);
/// let cropped = apply_crop(&image, &CropRect::new(0.25, 0.25, 0.5, 0.5));
/// assert_eq!((cropped.width, cropped.height), (50, 50));
/// ```
pub fn apply_crop(image: &DecodedImage, rect: &CropRect) -> DecodedImage {
    if rect.is_full() {
        return image.clone();
    }

    let (px_left, px_top, out_width, out_height) = rect.to_pixels(image.dimensions());
    let row_bytes = (out_width * 3) as usize;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    for y in 0..out_height {
        let start = (((px_top + y) * image.width + px_left) * 3) as usize;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    DecodedImage {
        width: out_width,
        height: out_height,
        pixels: output,
    }
}
