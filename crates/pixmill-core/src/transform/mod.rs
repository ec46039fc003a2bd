//! Geometric transforms: resize, rotate, flip and crop.
//!
//! # Transform Order
//!
//! When an edited image is rendered, transforms are applied in this order:
//! 1. Crop (normalized to the source image)
//! 2. Orientation (flips in the source frame, then quarter turns)
//! 3. Resize to the requested output dimensions
//!
//! Adjustments and text overlays run after all geometry.
//!
//! # Coordinate System
//!
//! - Rotation is in degrees, positive = clockwise, multiples of 90 only
//! - Crop coordinates are normalized (0.0 to 1.0) relative to the source image
//! - Origin is top-left corner

mod crop;
mod geometry;
mod orientation;
mod resize;

pub use crop::{apply_crop, CropRatio, CropRect};
pub use geometry::Geometry;
pub use orientation::{apply_orientation, Orientation};
pub use resize::{
    find_preset, fit_dimensions, generate_thumbnail, resize_image, resize_to_fit, ResizePreset,
    ResizeSession, RESIZE_PRESETS,
};
pub(crate) use resize::validate_dimensions;

use thiserror::Error;

/// Errors from geometric transforms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A requested output side is zero.
    #[error("Invalid dimensions {width}x{height}: both sides must be positive")]
    InvalidDimension { width: u32, height: u32 },

    /// Crop rectangle has a non-positive or non-finite component.
    #[error("Invalid crop rectangle")]
    InvalidCrop,

    /// Pixel buffer length does not match the image dimensions.
    #[error("Pixel buffer does not match image dimensions")]
    BufferMismatch,
}
