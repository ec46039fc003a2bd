//! PNG encoding.
//!
//! PNG is lossless, so there is no quality parameter at all. The encoder runs
//! at its best compression setting with adaptive filtering, which keeps the
//! output deterministic for a given pixel buffer.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::types::validate_rgb_buffer;
use super::{EncodeError, OutputFormat};

/// Encode RGB pixel data to PNG bytes.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate_rgb_buffer(pixels, width, height)?;

    let mut buffer = Cursor::new(Vec::new());
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Png,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&[10u8; 8 * 8 * 3], 8, 8).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_deterministic() {
        let pixels: Vec<u8> = (0..32 * 16 * 3).map(|i| (i % 251) as u8).collect();
        assert_eq!(
            encode_png(&pixels, 32, 16).unwrap(),
            encode_png(&pixels, 32, 16).unwrap()
        );
    }

    #[test]
    fn test_encode_png_rejects_bad_buffer() {
        assert!(matches!(
            encode_png(&[0u8; 5], 2, 2),
            Err(EncodeError::InvalidPixelData { .. })
        ));
        assert!(matches!(
            encode_png(&[], 0, 0),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
