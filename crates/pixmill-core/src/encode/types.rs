//! Shared types for the encoders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// File extension used for downloads (`jpeg` maps to `jpg`).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }

    /// Map a MIME type to an output format, if it is one we can write.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(OutputFormat::Jpeg),
            "image/png" => Some(OutputFormat::Png),
            "image/webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }

    /// Lossless formats have no quality axis.
    pub fn is_lossless(self) -> bool {
        matches!(self, OutputFormat::Png)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WebP",
        };
        f.write_str(name)
    }
}

/// Bytes produced by a single encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Quality actually used, `None` for lossless formats.
    pub quality: Option<u8>,
}

impl EncodedImage {
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }
}

/// Check that an RGB buffer matches its declared dimensions.
pub(crate) fn validate_rgb_buffer(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Webp.extension(), "webp");
    }

    #[test]
    fn test_from_mime_type() {
        assert_eq!(OutputFormat::from_mime_type("image/jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_mime_type(" IMAGE/PNG "), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_mime_type("image/webp"), Some(OutputFormat::Webp));
        assert_eq!(OutputFormat::from_mime_type("image/gif"), None);
    }

    #[test]
    fn test_only_png_is_lossless() {
        assert!(OutputFormat::Png.is_lossless());
        assert!(!OutputFormat::Jpeg.is_lossless());
        assert!(!OutputFormat::Webp.is_lossless());
    }

    #[test]
    fn test_format_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OutputFormat::Webp).unwrap(), "\"webp\"");
        let parsed: OutputFormat = serde_json::from_str("\"jpeg\"").unwrap();
        assert_eq!(parsed, OutputFormat::Jpeg);
    }

    #[test]
    fn test_validate_rgb_buffer() {
        assert!(validate_rgb_buffer(&[0; 12], 2, 2).is_ok());
        assert!(matches!(
            validate_rgb_buffer(&[0; 11], 2, 2),
            Err(EncodeError::InvalidPixelData { expected: 12, actual: 11 })
        ));
        assert!(matches!(
            validate_rgb_buffer(&[], 0, 2),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
