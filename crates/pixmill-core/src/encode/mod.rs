//! Image encoding for Pixmill.
//!
//! This module provides functionality for:
//! - Encoding RGB pixels to JPEG with configurable quality
//! - Encoding RGB pixels to lossless PNG (no quality axis)
//! - Encoding RGB pixels to WebP with configurable quality
//!
//! # Determinism
//!
//! Every encoder here is deterministic: identical `(pixels, format, quality)`
//! triples always produce byte-identical output. The target-size search
//! depends on this.
//!
//! # Examples
//!
//! ```ignore
//! use pixmill_core::encode::{encode, OutputFormat};
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let encoded = encode(&pixels, 100, 100, OutputFormat::Jpeg, 90).unwrap();
//! println!("Encoded {} bytes", encoded.byte_length());
//! ```

mod jpeg;
mod png;
mod types;
mod webp;

pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, EncodedImage, OutputFormat};
pub use webp::encode_webp;

/// Encode RGB pixels in the requested format.
///
/// `quality` (1-100) is used for JPEG and WebP. For PNG it is ignored, not
/// clamped: the result reports `quality: None`.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedImage, EncodeError> {
    let quality = quality.clamp(1, 100);
    let (bytes, used_quality) = match format {
        OutputFormat::Jpeg => (encode_jpeg(pixels, width, height, quality)?, Some(quality)),
        OutputFormat::Webp => (encode_webp(pixels, width, height, quality)?, Some(quality)),
        OutputFormat::Png => (encode_png(pixels, width, height)?, None),
    };

    Ok(EncodedImage {
        bytes,
        format,
        quality: used_quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_ignores_quality() {
        let pixels: Vec<u8> = (0..20 * 20 * 3).map(|i| (i % 200) as u8).collect();
        let a = encode(&pixels, 20, 20, OutputFormat::Png, 5).unwrap();
        let b = encode(&pixels, 20, 20, OutputFormat::Png, 100).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.quality, None);
    }

    #[test]
    fn test_lossy_reports_clamped_quality() {
        let pixels = vec![50u8; 4 * 4 * 3];
        let jpeg = encode(&pixels, 4, 4, OutputFormat::Jpeg, 0).unwrap();
        assert_eq!(jpeg.quality, Some(1));
        assert_eq!(jpeg.format, OutputFormat::Jpeg);

        let webp = encode(&pixels, 4, 4, OutputFormat::Webp, 77).unwrap();
        assert_eq!(webp.quality, Some(77));
        assert_eq!(webp.byte_length(), webp.bytes.len());
    }

    #[test]
    fn test_encode_propagates_validation_error() {
        let result = encode(&[0u8; 3], 2, 2, OutputFormat::Webp, 80);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }
}
