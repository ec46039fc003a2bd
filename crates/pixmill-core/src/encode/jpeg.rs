//! JPEG encoding for export and target-size compression.
//!
//! Uses the `image` crate's baseline JPEG encoder. The encoder is
//! deterministic: identical pixels and quality always yield identical bytes,
//! which the quality search relies on.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::types::validate_rgb_buffer;
use super::{EncodeError, OutputFormat};

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
///
/// # Example
///
/// ```
/// use pixmill_core::encode::encode_jpeg;
///
/// let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
/// let jpeg = encode_jpeg(&pixels, 100, 100, 90).unwrap();
///
/// // Verify JPEG magic bytes
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgb_buffer(pixels, width, height)?;

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=24, 1u32..=24),
            quality in 1u8..=100,
            seed in any::<u8>(),
        ) {
            let size = (width as usize) * (height as usize) * 3;
            let pixels: Vec<u8> = (0..size).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect();

            let first = encode_jpeg(&pixels, width, height, quality).unwrap();
            let second = encode_jpeg(&pixels, width, height, quality).unwrap();

            prop_assert_eq!(first, second);
        }

        /// Any valid buffer encodes to a well-formed stream.
        #[test]
        fn prop_valid_input_produces_markers(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 1u8..=100,
        ) {
            let pixels = vec![128u8; (width as usize) * (height as usize) * 3];
            let jpeg = encode_jpeg(&pixels, width, height, quality).unwrap();

            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }

        /// Mismatched buffer lengths are rejected before encoding.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            (width, height) in (1u32..=30, 1u32..=30),
            delta in -10i32..=10,
        ) {
            prop_assume!(delta != 0);
            let expected = (width as usize) * (height as usize) * 3;
            let actual = if delta > 0 {
                expected + delta as usize
            } else {
                expected.saturating_sub((-delta) as usize)
            };
            prop_assume!(actual != expected);

            let pixels = vec![0u8; actual];
            let is_invalid_data = matches!(
                encode_jpeg(&pixels, width, height, 80),
                Err(EncodeError::InvalidPixelData { .. })
            );
            prop_assert!(is_invalid_data);
        }
    }
}
