//! Pixmill Core - Image editing pipeline
//!
//! This crate provides the core editing functionality for Pixmill: decoding
//! user images, target-size compression, resize/rotate/flip/crop, CSS-style
//! adjustments and presets, text overlays, and the collection that ties them
//! together. It has no JavaScript dependencies; see `pixmill-wasm` for the
//! browser bindings.

pub mod adjust;
pub mod codec;
pub mod collection;
pub mod compress;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod text;
pub mod transform;

pub use adjust::{Adjustments, EffectKind, EffectStack, FilterPreset};
pub use codec::{Codec, ImageCodec};
pub use collection::{
    compress_batch, ExportArtifact, ExportKind, ImageCollection, ImageId, IngestFile,
};
pub use compress::{compress_image, CompressionOutcome, CompressionSettings, SearchOptions};
pub use config::EditorConfig;
pub use decode::{DecodedImage, Dimensions};
pub use encode::OutputFormat;
pub use error::EditError;
pub use text::{render_text_overlay, TextOverlaySpec};
pub use transform::{CropRect, Geometry, Orientation, ResizeSession};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_jpeg;

    fn photo(width: u32, height: u32) -> IngestFile {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        IngestFile::new(
            "beach.jpg",
            "image/jpeg",
            encode_jpeg(&pixels, width, height, 95).unwrap(),
        )
    }

    #[test]
    fn test_resize_session_feeds_export() {
        let mut collection = ImageCollection::new(EditorConfig::default());
        let id = collection.ingest(&[photo(192, 108)], &ImageCodec).added[0];

        let mut session = ResizeSession::new(collection.get(id).unwrap().current_dimensions());
        session.set_width(96);
        collection.set_resize(id, Some(session.target().unwrap())).unwrap();

        let artifact = collection
            .export_image(&ImageCodec, id, ExportKind::Resized, None)
            .unwrap();
        assert_eq!(artifact.filename, "beach_resized.jpg");

        let decoded = ImageCodec.decode(artifact.bytes()).unwrap();
        assert_eq!(decoded.dimensions(), Dimensions::new(96, 54));
    }

    #[test]
    fn test_watermark_export_is_reproducible() {
        let mut collection = ImageCollection::default();
        let id = collection.ingest(&[photo(64, 64)], &ImageCodec).added[0];
        collection
            .set_text_overlay(id, Some(TextOverlaySpec::new("(c) pixmill")))
            .unwrap();

        let settings = CompressionSettings::new(OutputFormat::Png, 80);
        let first = collection
            .export_image(&ImageCodec, id, ExportKind::Watermarked, Some(&settings))
            .unwrap();
        let second = collection
            .export_image(&ImageCodec, id, ExportKind::Watermarked, Some(&settings))
            .unwrap();
        assert_eq!(first.bytes(), second.bytes());
        assert_eq!(first.filename, "beach_watermarked.png");
    }

    #[test]
    fn test_settings_default_shape() {
        let settings = CompressionSettings::default();
        assert_eq!(settings.quality, 80);
        assert_eq!(settings.format, OutputFormat::Jpeg);
        assert_eq!(settings.target_size_kb, None);
    }
}
