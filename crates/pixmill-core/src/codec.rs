//! Uniform encode/decode contract over the concrete codecs.
//!
//! Everything above the codec layer (compressor, previews, export, batches)
//! talks to a [`Codec`] rather than to a specific encoder, so tests can swap in
//! a fake with a known size-versus-quality curve.

use crate::decode::{self, DecodeError, DecodedImage};
use crate::encode::{self, EncodeError, EncodedImage, OutputFormat};

/// Raster encode/decode capability.
///
/// Implementations must be deterministic: the same `(pixels, format,
/// quality)` must always produce the same bytes.
pub trait Codec {
    /// Decode container bytes into RGB pixels.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;

    /// Encode RGB pixels. `quality` is ignored for lossless formats.
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<EncodedImage, EncodeError>;
}

/// Production codec backed by the `image` crate encoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        decode::decode_image(bytes)
    }

    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<EncodedImage, EncodeError> {
        encode::encode(&image.pixels, image.width, image.height, format, quality)
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        (**self).decode(bytes)
    }

    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<EncodedImage, EncodeError> {
        (**self).encode(image, format, quality)
    }
}
