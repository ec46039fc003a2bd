//! The image collection: ordered store, selection and edit dispatch.

use std::sync::Arc;

use log::{debug, info, warn};

use super::image::{EditableImage, ImageId, ImageUpdate};
use crate::adjust::{EffectKind, FilterPreset};
use crate::codec::Codec;
use crate::config::EditorConfig;
use crate::decode::{DecodedImage, Dimensions, FilterType};
use crate::encode::OutputFormat;
use crate::error::EditError;
use crate::text::{render_text_overlay, TextOverlaySpec};
use crate::transform::{
    generate_thumbnail, resize_to_fit, validate_dimensions, CropRect, Geometry,
};

/// A file handed over by the host's file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl IngestFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// A file that could not be loaded.
#[derive(Debug)]
pub struct IngestRejection {
    pub name: String,
    pub error: EditError,
}

/// Outcome of [`ImageCollection::ingest`].
#[derive(Debug, Default)]
pub struct IngestReport {
    pub added: Vec<ImageId>,
    pub rejected: Vec<IngestRejection>,
}

/// Decode `file` into a new image with the given id.
///
/// Non-image MIME types are rejected before any decoding.
pub fn load_image<C: Codec>(
    file: &IngestFile,
    codec: &C,
    id: ImageId,
) -> Result<EditableImage, EditError> {
    if !file.mime_type.starts_with("image/") {
        return Err(EditError::UnsupportedMimeType(file.mime_type.clone()));
    }

    let decoded = codec.decode(&file.bytes)?;
    Ok(EditableImage::new(
        id,
        file.name.clone(),
        file.mime_type.clone(),
        Arc::from(file.bytes.as_slice()),
        decoded.dimensions(),
    ))
}

/// Ordered images plus the current selection.
///
/// Whenever the collection is non-empty exactly one image is current.
#[derive(Debug, Default)]
pub struct ImageCollection {
    images: Vec<EditableImage>,
    current: Option<ImageId>,
    next_id: u64,
    config: EditorConfig,
}

impl ImageCollection {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            images: Vec::new(),
            current: None,
            next_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) -> Result<(), EditError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Reserve a fresh id.
    pub fn allocate_id(&mut self) -> ImageId {
        self.next_id += 1;
        ImageId::new(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn ids(&self) -> Vec<ImageId> {
        self.images.iter().map(|img| img.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditableImage> {
        self.images.iter()
    }

    pub fn get(&self, id: ImageId) -> Option<&EditableImage> {
        self.images.iter().find(|img| img.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ImageId) -> Result<&mut EditableImage, EditError> {
        self.images
            .iter_mut()
            .find(|img| img.id() == id)
            .ok_or(EditError::ImageNotFound(id))
    }

    fn require(&self, id: ImageId) -> Result<&EditableImage, EditError> {
        self.get(id).ok_or(EditError::ImageNotFound(id))
    }

    pub fn current_id(&self) -> Option<ImageId> {
        self.current
    }

    pub fn current(&self) -> Option<&EditableImage> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn require_current(&self) -> Result<&EditableImage, EditError> {
        self.current().ok_or(EditError::EmptyCollection)
    }

    /// Small render of the image with its geometry applied, for the
    /// collection strip, at most `thumbnail_edge` on the long edge.
    pub fn thumbnail<C: Codec>(&self, codec: &C, id: ImageId) -> Result<DecodedImage, EditError> {
        let image = self.require(id)?;
        let decoded = codec.decode(image.original_bytes())?;
        let shaped = image.geometry().apply(&decoded, self.config.resample_filter)?;
        Ok(generate_thumbnail(&shaped, self.config.thumbnail_edge)?)
    }

    /// Append images. The first one becomes current if nothing was selected.
    ///
    /// Images whose id is already present are skipped.
    pub fn add_images(&mut self, images: Vec<EditableImage>) -> Vec<ImageId> {
        let mut added = Vec::with_capacity(images.len());
        for image in images {
            let id = image.id();
            if self.get(id).is_some() {
                warn!("image {id} is already in the collection, skipping");
                continue;
            }
            self.next_id = self.next_id.max(id.value());
            self.images.push(image);
            added.push(id);
        }

        if self.current.is_none() {
            self.current = added.first().copied();
        }
        added
    }

    /// Load host files, isolating failures per file.
    pub fn ingest<C: Codec>(&mut self, files: &[IngestFile], codec: &C) -> IngestReport {
        let mut report = IngestReport::default();
        let mut loaded = Vec::new();

        for file in files {
            let id = self.allocate_id();
            match load_image(file, codec, id) {
                Ok(image) => loaded.push(image),
                Err(error) => {
                    warn!("could not load {}: {error}", file.name);
                    report.rejected.push(IngestRejection {
                        name: file.name.clone(),
                        error,
                    });
                }
            }
        }

        report.added = self.add_images(loaded);
        info!(
            "ingested {} of {} files",
            report.added.len(),
            files.len()
        );
        report
    }

    /// Remove an image. If it was current, the next image (or the first
    /// remaining one) becomes current.
    pub fn remove_image(&mut self, id: ImageId) -> Result<EditableImage, EditError> {
        let index = self
            .images
            .iter()
            .position(|img| img.id() == id)
            .ok_or(EditError::ImageNotFound(id))?;
        let removed = self.images.remove(index);

        if self.current == Some(id) {
            self.current = self
                .images
                .get(index)
                .or_else(|| self.images.first())
                .map(|img| img.id());
        }
        Ok(removed)
    }

    pub fn select_image(&mut self, id: ImageId) -> Result<(), EditError> {
        self.require(id)?;
        self.current = Some(id);
        Ok(())
    }

    /// Apply a partial update. Validation happens before anything changes;
    /// custom effect values are clamped into range.
    pub fn update_image(&mut self, id: ImageId, update: ImageUpdate) -> Result<(), EditError> {
        if let Some(Some(overlay)) = &update.text_overlay {
            overlay.validate()?;
        }
        if let Some(geometry) = &update.geometry {
            validate_geometry(geometry)?;
        }

        let image = self.get_mut(id)?;
        if let Some(name) = update.name {
            image.name = name;
        }
        if let Some(adjustments) = update.adjustments {
            image.adjustments = adjustments.sanitized();
        }
        if let Some(geometry) = update.geometry {
            image.geometry = geometry;
        }
        if let Some(overlay) = update.text_overlay {
            image.text_overlay = overlay;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.current = None;
    }

    pub fn set_effect(&mut self, id: ImageId, kind: EffectKind, value: f32) -> Result<(), EditError> {
        self.get_mut(id)?.adjustments.set_effect(kind, value);
        Ok(())
    }

    pub fn apply_preset(&mut self, id: ImageId, preset: FilterPreset) -> Result<(), EditError> {
        self.get_mut(id)?.adjustments.apply_preset(preset);
        Ok(())
    }

    /// Back to the default stack. The preview shows the original bytes again
    /// when no geometry or text is pending.
    pub fn reset_adjustments(&mut self, id: ImageId) -> Result<(), EditError> {
        let image = self.get_mut(id)?;
        image.adjustments.reset();
        if image.preview_is_original() {
            image.restore_original_preview();
        }
        Ok(())
    }

    pub fn rotate_right(&mut self, id: ImageId) -> Result<(), EditError> {
        self.get_mut(id)?.geometry.rotate_right();
        Ok(())
    }

    pub fn rotate_left(&mut self, id: ImageId) -> Result<(), EditError> {
        self.get_mut(id)?.geometry.rotate_left();
        Ok(())
    }

    pub fn toggle_flip_horizontal(&mut self, id: ImageId) -> Result<(), EditError> {
        self.get_mut(id)?.geometry.orientation.toggle_flip_horizontal();
        Ok(())
    }

    pub fn toggle_flip_vertical(&mut self, id: ImageId) -> Result<(), EditError> {
        self.get_mut(id)?.geometry.orientation.toggle_flip_vertical();
        Ok(())
    }

    /// Set (or clear) the output size. Zero sides are rejected.
    pub fn set_resize(&mut self, id: ImageId, target: Option<Dimensions>) -> Result<(), EditError> {
        if let Some(dims) = target {
            validate_dimensions(dims.width, dims.height)?;
        }
        self.get_mut(id)?.geometry.resize = target;
        Ok(())
    }

    pub fn set_crop(&mut self, id: ImageId, crop: Option<CropRect>) -> Result<(), EditError> {
        if let Some(rect) = &crop {
            rect.validate()?;
        }
        self.get_mut(id)?.geometry.crop = crop;
        Ok(())
    }

    pub fn set_text_overlay(
        &mut self,
        id: ImageId,
        overlay: Option<TextOverlaySpec>,
    ) -> Result<(), EditError> {
        self.update_image(id, ImageUpdate::default().text_overlay(overlay))
    }

    pub fn reset_geometry(&mut self, id: ImageId) -> Result<(), EditError> {
        let image = self.get_mut(id)?;
        image.geometry = Geometry::default();
        if image.preview_is_original() {
            image.restore_original_preview();
        }
        Ok(())
    }

    /// Drop every edit and show the original again.
    pub fn reset_all(&mut self, id: ImageId) -> Result<(), EditError> {
        let image = self.get_mut(id)?;
        image.adjustments.reset();
        image.geometry = Geometry::default();
        image.text_overlay = None;
        image.restore_original_preview();
        Ok(())
    }

    /// Snapshot the image's edit state for an off-thread preview render.
    pub fn begin_preview(&mut self, id: ImageId) -> Result<PreviewJob, EditError> {
        let format = self.config.preview_format;
        let max_edge = self.config.preview_max_edge;
        let filter = self.config.resample_filter;

        let image = self.get_mut(id)?;
        image.issued_sequence += 1;
        Ok(PreviewJob {
            image_id: id,
            sequence: image.issued_sequence,
            original_bytes: Arc::clone(image.original_bytes()),
            original_mime_type: image.mime_type().to_string(),
            original_dimensions: image.original_dimensions(),
            geometry: image.geometry,
            text_overlay: image.text_overlay.clone(),
            format,
            max_edge,
            filter,
        })
    }

    /// Install a finished preview unless a newer one was already applied.
    ///
    /// Returns whether the result was applied.
    pub fn complete_preview(&mut self, result: PreviewResult) -> bool {
        let Ok(image) = self.get_mut(result.image_id) else {
            debug!("preview for removed image {} dropped", result.image_id);
            return false;
        };
        if result.sequence < image.applied_sequence {
            debug!(
                "stale preview #{} for image {} dropped (showing #{})",
                result.sequence, result.image_id, image.applied_sequence
            );
            return false;
        }

        image.applied_sequence = result.sequence;
        image.set_preview(result.bytes, result.mime_type, result.dimensions);
        true
    }
}

fn validate_geometry(geometry: &Geometry) -> Result<(), EditError> {
    if let Some(rect) = &geometry.crop {
        rect.validate()?;
    }
    if let Some(dims) = geometry.resize {
        validate_dimensions(dims.width, dims.height)?;
    }
    Ok(())
}

/// Everything needed to render one preview, detached from the collection.
#[derive(Debug, Clone)]
pub struct PreviewJob {
    pub image_id: ImageId,
    pub sequence: u64,
    original_bytes: Arc<[u8]>,
    original_mime_type: String,
    original_dimensions: Dimensions,
    geometry: Geometry,
    text_overlay: Option<TextOverlaySpec>,
    format: OutputFormat,
    max_edge: Option<u32>,
    filter: FilterType,
}

/// Rendered preview bytes tagged with the job's sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewResult {
    pub image_id: ImageId,
    pub sequence: u64,
    pub bytes: Arc<[u8]>,
    pub mime_type: String,
    pub dimensions: Dimensions,
}

impl PreviewJob {
    /// Render the preview. Adjustments are not baked: the host shows them
    /// with the CSS filter.
    pub fn run<C: Codec>(&self, codec: &C) -> Result<PreviewResult, EditError> {
        if self.geometry.is_identity() && self.text_overlay.is_none() {
            return Ok(PreviewResult {
                image_id: self.image_id,
                sequence: self.sequence,
                bytes: Arc::clone(&self.original_bytes),
                mime_type: self.original_mime_type.clone(),
                dimensions: self.original_dimensions,
            });
        }

        let decoded = codec.decode(&self.original_bytes)?;
        let mut rendered: DecodedImage = self.geometry.apply(&decoded, self.filter)?;
        if let Some(overlay) = &self.text_overlay {
            rendered = render_text_overlay(&rendered, overlay)?;
        }
        if let Some(edge) = self.max_edge {
            rendered = resize_to_fit(&rendered, edge, self.filter)?;
        }

        let encoded = codec.encode(&rendered, self.format, 90)?;
        Ok(PreviewResult {
            image_id: self.image_id,
            sequence: self.sequence,
            bytes: Arc::from(encoded.bytes),
            mime_type: self.format.mime_type().to_string(),
            dimensions: rendered.dimensions(),
        })
    }
}
