//! Text and watermark overlays.
//!
//! An overlay is described by a [`TextOverlaySpec`] and rasterized onto a
//! copy of the image with [`render_text_overlay`]. Rendering uses a built-in
//! bitmap face, so the output is identical on every platform.

mod overlay;
mod render;

pub use overlay::{
    parse_hex_color, Rgba, TextAlign, TextOverlaySpec, MAX_FONT_SIZE_PX, MIN_FONT_SIZE_PX,
};
pub use render::{measure_text, render_text_overlay};

use thiserror::Error;

/// Errors from text overlay validation and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("Overlay text is empty")]
    EmptyText,

    #[error("Invalid colour {0:?}: expected #RGB, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}
