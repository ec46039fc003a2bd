//! Resizing: aspect-locked dimension editing and resampling.
//!
//! [`ResizeSession`] holds the resize tool's state. The aspect ratio is
//! captured once when the tool opens and reused for every edit, so typing a
//! width, then a height, then a width again never drifts from repeated
//! rounding.

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::decode::{DecodedImage, Dimensions, FilterType};

/// A named output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizePreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Built-in presets offered by the resize tool.
pub const RESIZE_PRESETS: &[ResizePreset] = &[
    ResizePreset { name: "Instagram Square", width: 1080, height: 1080 },
    ResizePreset { name: "Instagram Portrait", width: 1080, height: 1350 },
    ResizePreset { name: "Instagram Story", width: 1080, height: 1920 },
    ResizePreset { name: "Facebook Post", width: 1200, height: 630 },
    ResizePreset { name: "Twitter Post", width: 1600, height: 900 },
    ResizePreset { name: "YouTube Thumbnail", width: 1280, height: 720 },
    ResizePreset { name: "HD 720p", width: 1280, height: 720 },
    ResizePreset { name: "Full HD 1080p", width: 1920, height: 1080 },
    ResizePreset { name: "4K UHD", width: 3840, height: 2160 },
];

/// Look up a preset by name (case-insensitive).
pub fn find_preset(name: &str) -> Option<&'static ResizePreset> {
    RESIZE_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

/// State of the resize tool for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeSession {
    source: Dimensions,
    aspect_ratio: f64,
    width: u32,
    height: u32,
    lock_aspect: bool,
}

impl ResizeSession {
    /// Open the tool on an image of `source` dimensions, with the ratio locked.
    pub fn new(source: Dimensions) -> Self {
        Self {
            source,
            aspect_ratio: source.aspect_ratio(),
            width: source.width,
            height: source.height,
            lock_aspect: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn source(&self) -> Dimensions {
        self.source
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn is_locked(&self) -> bool {
        self.lock_aspect
    }

    pub fn set_lock(&mut self, locked: bool) {
        self.lock_aspect = locked;
    }

    pub fn toggle_lock(&mut self) {
        self.lock_aspect = !self.lock_aspect;
    }

    /// Set the width; with the lock on, height becomes `round(width / ratio)`.
    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        if self.lock_aspect {
            self.height = (width as f64 / self.aspect_ratio).round() as u32;
        }
    }

    /// Set the height; with the lock on, width becomes `round(height * ratio)`.
    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        if self.lock_aspect {
            self.width = (height as f64 * self.aspect_ratio).round() as u32;
        }
    }

    /// Scale both sides from the source dimensions.
    pub fn set_scale_percent(&mut self, percent: f64) {
        let factor = percent.max(0.0) / 100.0;
        self.width = (self.source.width as f64 * factor).round() as u32;
        self.height = (self.source.height as f64 * factor).round() as u32;
    }

    /// Apply a preset: sets both sides exactly and releases the lock.
    pub fn apply_preset(&mut self, preset: &ResizePreset) {
        self.lock_aspect = false;
        self.width = preset.width;
        self.height = preset.height;
    }

    /// Back to the source dimensions with the lock on.
    pub fn reset(&mut self) {
        *self = Self::new(self.source);
    }

    /// The requested output size, rejecting any zero side.
    pub fn target(&self) -> Result<Dimensions, TransformError> {
        validate_dimensions(self.width, self.height)
    }
}

pub(crate) fn validate_dimensions(width: u32, height: u32) -> Result<Dimensions, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimension { width, height });
    }
    Ok(Dimensions::new(width, height))
}

/// Resample `image` to exactly `width` x `height`.
pub fn resize_image(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, TransformError> {
    validate_dimensions(width, height)?;

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image.to_rgb_image().ok_or(TransformError::BufferMismatch)?;
    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Shrink `image` so its longest edge is at most `max_edge`, keeping the
/// aspect ratio. Images already within bounds are returned unchanged.
pub fn resize_to_fit(
    image: &DecodedImage,
    max_edge: u32,
    filter: FilterType,
) -> Result<DecodedImage, TransformError> {
    if max_edge == 0 {
        return Err(TransformError::InvalidDimension {
            width: 0,
            height: 0,
        });
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let fit = fit_dimensions(image.dimensions(), max_edge);
    resize_image(image, fit.width, fit.height, filter)
}

/// Small preview for collection strips, at most `size` pixels on the long edge.
pub fn generate_thumbnail(image: &DecodedImage, size: u32) -> Result<DecodedImage, TransformError> {
    resize_to_fit(image, size, FilterType::Bilinear)
}

/// Dimensions that fit within `max_edge` while preserving aspect ratio.
pub fn fit_dimensions(source: Dimensions, max_edge: u32) -> Dimensions {
    if source.width == 0 || source.height == 0 {
        return Dimensions::new(0, 0);
    }

    let ratio = source.aspect_ratio();
    if source.width >= source.height {
        let height = (max_edge as f64 / ratio).round() as u32;
        Dimensions::new(max_edge, height.max(1))
    } else {
        let width = (max_edge as f64 * ratio).round() as u32;
        Dimensions::new(width.max(1), max_edge)
    }
}
