//! WebP encoding.
//!
//! The pure-Rust WebP encoder in the `image` crate only writes lossless
//! bitstreams. Quality is therefore applied before encoding by truncating
//! each channel to fewer significant bits. Dropping low bits removes entropy
//! while keeping neighbour differences regular, so the lossless predictors
//! keep working and the stream shrinks as quality drops. Quality 100 keeps
//! all eight bits.
//!
//! This keeps the codec free of C dependencies (important for the WASM build)
//! and, like the JPEG path, fully deterministic.

use std::io::Cursor;

use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::types::validate_rgb_buffer;
use super::{EncodeError, OutputFormat};

/// Encode RGB pixel data to WebP bytes at the given quality (1-100).
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgb_buffer(pixels, width, height)?;

    let bits = bits_for_quality(quality);
    let mut truncated;
    let data = if bits < 8 {
        truncated = pixels.to_vec();
        truncate_channels(&mut truncated, bits);
        truncated.as_slice()
    } else {
        pixels
    };

    let mut buffer = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buffer)
        .write_image(data, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Webp,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// Keep the top `bits` bits of every channel, centred in the dropped range.
fn truncate_channels(data: &mut [u8], bits: u8) {
    let dropped = 8 - u32::from(bits.clamp(1, 8));
    let mask = (0xFFu32 << dropped) as u8;
    let centre = ((1u32 << dropped) >> 1) as u8;
    for value in data.iter_mut() {
        *value = (*value & mask) | centre;
    }
}

/// Significant bits kept per channel: 1 at quality 1, 8 at quality 100.
fn bits_for_quality(quality: u8) -> u8 {
    let quality = u32::from(quality.clamp(1, 100));
    (1 + (quality - 1) * 7 / 99) as u8
}
