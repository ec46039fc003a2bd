//! Image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use super::{DecodeError, DecodedImage, ExifOrientation};
use crate::encode::OutputFormat;

/// Decode JPEG, PNG or WebP bytes, applying EXIF orientation correction.
///
/// The format is sniffed from the content, not taken from a file name or
/// MIME type.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` for an empty buffer,
/// `DecodeError::InvalidFormat` if the bytes are not a supported format and
/// `DecodeError::CorruptedFile` if decoding fails part way through.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let img = decode_dynamic(bytes)?;

    let orientation = extract_orientation(bytes);
    let rgb_img = apply_exif_orientation(img, orientation).into_rgb8();

    let (width, height) = rgb_img.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

/// Sniff the container format from magic bytes.
///
/// Returns `None` for anything other than JPEG, PNG or WebP.
pub fn detect_format(bytes: &[u8]) -> Option<OutputFormat> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
        ImageFormat::Png => Some(OutputFormat::Png),
        ImageFormat::WebP => Some(OutputFormat::Webp),
        _ => None,
    }
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })
}

/// Extract EXIF orientation from container bytes.
///
/// Returns `ExifOrientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> ExifOrientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(ExifOrientation::from)
            .unwrap_or_default(),
        Err(_) => ExifOrientation::Normal,
    }
}

fn apply_exif_orientation(img: DynamicImage, orientation: ExifOrientation) -> DynamicImage {
    match orientation {
        ExifOrientation::Normal => img,
        ExifOrientation::FlipHorizontal => img.fliph(),
        ExifOrientation::Rotate180 => img.rotate180(),
        ExifOrientation::FlipVertical => img.flipv(),
        ExifOrientation::Transpose => img.rotate90().fliph(),
        ExifOrientation::Rotate90CW => img.rotate90(),
        ExifOrientation::Transverse => img.rotate270().fliph(),
        ExifOrientation::Rotate270CW => img.rotate270(),
    }
}
