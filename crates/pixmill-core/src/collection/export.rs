//! Rendering edited images into downloadable artifacts.
//!
//! ## Export Pipeline
//! 1. Decode the original bytes
//! 2. Crop, orientation, resize
//! 3. Bake adjustments
//! 4. Draw the text overlay
//! 5. Encode through the compressor
//!
//! Export is all-or-nothing: on any error the image's state is untouched.

use log::info;
use serde::{Deserialize, Serialize};

use super::image::{EditableImage, ImageId};
use super::manager::ImageCollection;
use crate::codec::Codec;
use crate::compress::{compress_image, CompressionOutcome, CompressionSettings};
use crate::decode::{DecodedImage, FilterType};
use crate::encode::OutputFormat;
use crate::error::EditError;
use crate::text::render_text_overlay;

/// Which tool produced an export. Determines the filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportKind {
    Compressed,
    Resized,
    Cropped,
    Adjusted,
    Watermarked,
    #[default]
    Edited,
}

impl ExportKind {
    pub fn suffix(self) -> &'static str {
        match self {
            ExportKind::Compressed => "_compressed",
            ExportKind::Resized => "_resized",
            ExportKind::Cropped => "_cropped",
            ExportKind::Adjusted => "_adjusted",
            ExportKind::Watermarked => "_watermarked",
            ExportKind::Edited => "_edited",
        }
    }
}

/// `{base}{suffix}.{ext}`, where `base` is `name` without its extension.
pub fn suggested_filename(name: &str, kind: ExportKind, format: OutputFormat) -> String {
    let base = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    format!("{base}{}.{}", kind.suffix(), format.extension())
}

/// An encoded export ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub image_id: ImageId,
    pub filename: String,
    pub outcome: CompressionOutcome,
}

impl ExportArtifact {
    pub fn bytes(&self) -> &[u8] {
        &self.outcome.encoded.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.outcome.encoded.format.mime_type()
    }

    pub fn byte_length(&self) -> usize {
        self.outcome.byte_length()
    }
}

/// Apply every pending edit to the decoded original.
pub fn render_edits<C: Codec>(
    image: &EditableImage,
    codec: &C,
    filter: FilterType,
) -> Result<DecodedImage, EditError> {
    let decoded = codec.decode(image.original_bytes())?;
    let shaped = image.geometry().apply(&decoded, filter)?;
    let mut rendered = image.adjustments().bake(&shaped);
    if let Some(overlay) = image.text_overlay() {
        rendered = render_text_overlay(&rendered, overlay)?;
    }
    Ok(rendered)
}

impl ImageCollection {
    /// Render and encode an image. `settings` defaults to the configured
    /// compression settings.
    ///
    /// On success the image's `byte_size` becomes the artifact size.
    pub fn export_image<C: Codec>(
        &mut self,
        codec: &C,
        id: ImageId,
        kind: ExportKind,
        settings: Option<&CompressionSettings>,
    ) -> Result<ExportArtifact, EditError> {
        let config = self.config();
        let settings = settings.copied().unwrap_or(config.default_compression);
        let options = config.search;
        let filter = config.resample_filter;

        let image = self.get(id).ok_or(EditError::ImageNotFound(id))?;
        let rendered = render_edits(image, codec, filter)?;
        let outcome = compress_image(codec, &rendered, &settings, &options)?;
        let filename = suggested_filename(&image.name, kind, settings.format);

        info!(
            "exported {} as {filename}: {} -> {}",
            image.name,
            format_bytes(image.original_bytes().len() as u64),
            format_bytes(outcome.byte_length() as u64)
        );

        let artifact = ExportArtifact {
            image_id: id,
            filename,
            outcome,
        };
        self.get_mut(id)?.byte_size = artifact.byte_length();
        Ok(artifact)
    }
}

/// Human-readable size: `"N B"`, one-decimal `KB` or two-decimal `MB`.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// Percentage saved going from `original` to `output` bytes.
///
/// Negative when the output is larger; zero for an empty original.
pub fn percent_saved(original: usize, output: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - output as f64 / original as f64) * 100.0
}

/// One artifact of a multi-file export with its delivery offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledDelivery {
    pub offset_ms: u64,
    pub artifact: ExportArtifact,
}

/// Space deliveries `delay_ms` apart, in order. The host's timer performs
/// each download.
pub fn schedule_deliveries(artifacts: Vec<ExportArtifact>, delay_ms: u32) -> Vec<ScheduledDelivery> {
    artifacts
        .into_iter()
        .enumerate()
        .map(|(index, artifact)| ScheduledDelivery {
            offset_ms: index as u64 * delay_ms as u64,
            artifact,
        })
        .collect()
}
