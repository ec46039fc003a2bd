//! The stateful editor: an image collection behind a JavaScript class.
//!
//! ```typescript
//! const editor = new JsEditor({ previewMaxEdge: 1600 });
//! const id = editor.add_file(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
//! editor.set_effect(id, 'brightness', 120);
//! img.style.filter = editor.preview_filter(id);
//!
//! editor.rotate_right(id);
//! editor.render_preview(id);
//! img.src = URL.createObjectURL(new Blob([editor.preview_bytes(id)], { type: editor.preview_mime_type(id) }));
//!
//! const report = editor.compress_batch(null, { format: 'webp', targetSizeKB: 300 },
//!   (done, total) => progress.value = done / total);
//! for (let i = 0; i < report.artifact_count; i++) {
//!   const artifact = report.artifact(i);
//!   setTimeout(() => download(artifact), artifact.delivery_offset_ms);
//! }
//! ```

use pixmill_core::collection::{
    compress_batch, schedule_deliveries, ExportArtifact, ExportKind, ImageId, ImageUpdate,
    IngestFile, ScheduledDelivery,
};
use pixmill_core::compress::CompressionSettings;
use pixmill_core::config::ConfigError;
use pixmill_core::{
    CropRect, Dimensions, EditError, EditorConfig, FilterPreset, ImageCodec, ImageCollection,
};
use wasm_bindgen::prelude::*;

use crate::adjust::effect_kind_from_name;
use crate::text::spec_from_js;
use crate::types::{js_error, JsDecodedImage};

fn export_kind_from_name(name: &str) -> Option<ExportKind> {
    match name.trim().to_ascii_lowercase().as_str() {
        "compressed" | "compress" => Some(ExportKind::Compressed),
        "resized" | "resize" => Some(ExportKind::Resized),
        "cropped" | "crop" => Some(ExportKind::Cropped),
        "adjusted" | "adjust" | "filters" => Some(ExportKind::Adjusted),
        "watermarked" | "watermark" | "text" => Some(ExportKind::Watermarked),
        "edited" | "" => Some(ExportKind::Edited),
        _ => None,
    }
}

fn settings_from_js(value: JsValue) -> Result<Option<CompressionSettings>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| js_error(format!("Invalid compression settings: {e}")))
}

/// An encoded export ready for download.
#[wasm_bindgen]
pub struct JsExportArtifact {
    artifact: ExportArtifact,
    offset_ms: u64,
}

#[wasm_bindgen]
impl JsExportArtifact {
    #[wasm_bindgen(getter)]
    pub fn image_id(&self) -> u64 {
        self.artifact.image_id.value()
    }

    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.artifact.filename.clone()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.artifact.bytes().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.artifact.mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.artifact.byte_length()
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> Option<u8> {
        self.artifact.outcome.quality()
    }

    #[wasm_bindgen(getter)]
    pub fn budget_met(&self) -> bool {
        self.artifact.outcome.budget_met
    }

    /// Milliseconds to wait before starting this download.
    #[wasm_bindgen(getter)]
    pub fn delivery_offset_ms(&self) -> f64 {
        self.offset_ms as f64
    }
}

impl JsExportArtifact {
    fn immediate(artifact: ExportArtifact) -> Self {
        Self {
            artifact,
            offset_ms: 0,
        }
    }
}

impl From<ScheduledDelivery> for JsExportArtifact {
    fn from(delivery: ScheduledDelivery) -> Self {
        Self {
            artifact: delivery.artifact,
            offset_ms: delivery.offset_ms,
        }
    }
}

/// Outcome of a bulk compression.
#[wasm_bindgen]
pub struct JsBatchReport {
    deliveries: Vec<ScheduledDelivery>,
    failures: Vec<(String, String)>,
    processed: usize,
    total: usize,
    total_original_size: usize,
    total_output_size: usize,
}

#[wasm_bindgen]
impl JsBatchReport {
    #[wasm_bindgen(getter)]
    pub fn processed(&self) -> usize {
        self.processed
    }

    #[wasm_bindgen(getter)]
    pub fn total(&self) -> usize {
        self.total
    }

    #[wasm_bindgen(getter)]
    pub fn total_original_size(&self) -> usize {
        self.total_original_size
    }

    #[wasm_bindgen(getter)]
    pub fn total_output_size(&self) -> usize {
        self.total_output_size
    }

    #[wasm_bindgen(getter)]
    pub fn artifact_count(&self) -> usize {
        self.deliveries.len()
    }

    /// The `index`-th artifact with its delivery offset.
    pub fn artifact(&self, index: usize) -> Option<JsExportArtifact> {
        self.deliveries.get(index).cloned().map(JsExportArtifact::from)
    }

    /// Names of the images that failed, in order.
    pub fn failed_names(&self) -> Vec<String> {
        self.failures.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Error messages, parallel to `failed_names()`.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(|(_, msg)| msg.clone()).collect()
    }
}

/// Image collection with the default codec.
#[wasm_bindgen]
pub struct JsEditor {
    collection: ImageCollection,
    codec: ImageCodec,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor. `config` is a partial `EditorConfig` object or
    /// `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| js_error(format!("Invalid editor config: {e}")))?
        };
        Self::with_config(config).map_err(js_error)
    }

    /// Decode and add a file. Returns its id.
    pub fn add_file(&mut self, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<u64, JsValue> {
        let file = IngestFile::new(name, mime_type, bytes);
        let mut report = self.collection.ingest(std::slice::from_ref(&file), &self.codec);
        if let Some(rejection) = report.rejected.pop() {
            return Err(js_error(rejection.error));
        }
        report
            .added
            .first()
            .map(|id| id.value())
            .ok_or_else(|| js_error(format!("{name} was not added")))
    }

    pub fn ids(&self) -> Vec<u64> {
        self.collection.ids().into_iter().map(ImageId::value).collect()
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    #[wasm_bindgen(getter)]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    #[wasm_bindgen(getter)]
    pub fn current_id(&self) -> Option<u64> {
        self.collection.current_id().map(ImageId::value)
    }

    pub fn name(&self, id: u64) -> Option<String> {
        self.collection.get(ImageId::new(id)).map(|img| img.name.clone())
    }

    /// Size of the last export, or of the original before any export.
    pub fn byte_size(&self, id: u64) -> Option<usize> {
        self.collection.get(ImageId::new(id)).map(|img| img.byte_size())
    }

    /// `[width, height]` after pending geometry.
    pub fn current_dimensions(&self, id: u64) -> Option<Vec<u32>> {
        self.collection.get(ImageId::new(id)).map(|img| {
            let dims = img.current_dimensions();
            vec![dims.width, dims.height]
        })
    }

    pub fn remove(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection
            .remove_image(ImageId::new(id))
            .map(|_| ())
            .map_err(js_error)
    }

    pub fn select(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection.select_image(ImageId::new(id)).map_err(js_error)
    }

    pub fn clear(&mut self) {
        self.collection.clear();
    }

    pub fn rename(&mut self, id: u64, name: &str) -> Result<(), JsValue> {
        let update = ImageUpdate::default().name(name);
        self.collection
            .update_image(ImageId::new(id), update)
            .map_err(js_error)
    }

    /// Set one effect: `"brightness"`, `"contrast"`, `"saturation"`, `"hue"`
    /// or `"blur"`. Out-of-range values are clamped.
    pub fn set_effect(&mut self, id: u64, kind: &str, value: f32) -> Result<(), JsValue> {
        let kind =
            effect_kind_from_name(kind).ok_or_else(|| js_error(format!("Unknown effect: {kind}")))?;
        self.collection
            .set_effect(ImageId::new(id), kind, value)
            .map_err(js_error)
    }

    pub fn apply_preset(&mut self, id: u64, label: &str) -> Result<(), JsValue> {
        let preset = FilterPreset::from_label(label)
            .ok_or_else(|| js_error(format!("Unknown preset: {label}")))?;
        self.collection
            .apply_preset(ImageId::new(id), preset)
            .map_err(js_error)
    }

    pub fn reset_adjustments(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection
            .reset_adjustments(ImageId::new(id))
            .map_err(js_error)
    }

    /// CSS `filter` to lay over the preview.
    pub fn preview_filter(&self, id: u64) -> Option<String> {
        self.collection
            .get(ImageId::new(id))
            .map(|img| img.preview_filter())
    }

    pub fn rotate_right(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection.rotate_right(ImageId::new(id)).map_err(js_error)
    }

    pub fn rotate_left(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection.rotate_left(ImageId::new(id)).map_err(js_error)
    }

    pub fn flip_horizontal(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection
            .toggle_flip_horizontal(ImageId::new(id))
            .map_err(js_error)
    }

    pub fn flip_vertical(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection
            .toggle_flip_vertical(ImageId::new(id))
            .map_err(js_error)
    }

    pub fn set_resize(&mut self, id: u64, width: u32, height: u32) -> Result<(), JsValue> {
        self.collection
            .set_resize(ImageId::new(id), Some(Dimensions::new(width, height)))
            .map_err(js_error)
    }

    pub fn clear_resize(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection
            .set_resize(ImageId::new(id), None)
            .map_err(js_error)
    }

    /// Crop with normalized coordinates (0.0 to 1.0).
    pub fn set_crop(
        &mut self,
        id: u64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        let rect = CropRect::new(left, top, width, height);
        self.collection
            .set_crop(ImageId::new(id), Some(rect))
            .map_err(js_error)
    }

    pub fn clear_crop(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection
            .set_crop(ImageId::new(id), None)
            .map_err(js_error)
    }

    pub fn reset_geometry(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection
            .reset_geometry(ImageId::new(id))
            .map_err(js_error)
    }

    /// Attach a text overlay (`TextOverlaySpec`-shaped object).
    pub fn set_text_overlay(&mut self, id: u64, spec: JsValue) -> Result<(), JsValue> {
        let spec = spec_from_js(spec)?;
        self.collection
            .set_text_overlay(ImageId::new(id), Some(spec))
            .map_err(js_error)
    }

    pub fn clear_text_overlay(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection
            .set_text_overlay(ImageId::new(id), None)
            .map_err(js_error)
    }

    pub fn reset_all(&mut self, id: u64) -> Result<(), JsValue> {
        self.collection.reset_all(ImageId::new(id)).map_err(js_error)
    }

    /// Re-render the preview for pending geometry and text.
    ///
    /// Returns `false` when a newer preview was already installed.
    /// Thumbnail for the collection strip, sized by `thumbnailEdge`.
    pub fn thumbnail(&self, id: u64) -> Result<JsDecodedImage, JsValue> {
        self.collection
            .thumbnail(&self.codec, ImageId::new(id))
            .map(JsDecodedImage::from_decoded)
            .map_err(js_error)
    }

    pub fn render_preview(&mut self, id: u64) -> Result<bool, JsValue> {
        let job = self
            .collection
            .begin_preview(ImageId::new(id))
            .map_err(js_error)?;
        let result = job.run(&self.codec).map_err(js_error)?;
        Ok(self.collection.complete_preview(result))
    }

    pub fn preview_bytes(&self, id: u64) -> Option<Vec<u8>> {
        self.collection
            .get(ImageId::new(id))
            .map(|img| img.preview_bytes().to_vec())
    }

    pub fn preview_mime_type(&self, id: u64) -> Option<String> {
        self.collection
            .get(ImageId::new(id))
            .map(|img| img.preview_mime_type().to_string())
    }

    /// Render every edit and encode. `kind` picks the filename suffix;
    /// `settings` falls back to the configured defaults.
    pub fn export(
        &mut self,
        id: u64,
        kind: &str,
        settings: JsValue,
    ) -> Result<JsExportArtifact, JsValue> {
        let kind =
            export_kind_from_name(kind).ok_or_else(|| js_error(format!("Unknown export: {kind}")))?;
        let settings = settings_from_js(settings)?;
        self.export_with(id, kind, settings.as_ref())
            .map_err(js_error)
    }

    /// Compress `ids` (every image when `undefined`) one after another.
    ///
    /// `on_progress(processed, total)` is called after each image.
    pub fn compress_batch(
        &mut self,
        ids: Option<Vec<u64>>,
        settings: JsValue,
        on_progress: Option<js_sys::Function>,
    ) -> Result<JsBatchReport, JsValue> {
        let settings = settings_from_js(settings)?
            .unwrap_or(self.collection.config().default_compression);
        let selection: Option<Vec<ImageId>> =
            ids.map(|ids| ids.into_iter().map(ImageId::new).collect());

        Ok(self.batch_with(selection.as_deref(), &settings, |processed, total| {
            if let Some(callback) = &on_progress {
                let result = callback.call2(
                    &JsValue::NULL,
                    &JsValue::from(processed as u32),
                    &JsValue::from(total as u32),
                );
                if let Err(err) = result {
                    log::warn!("progress callback failed: {err:?}");
                }
            }
        }))
    }
}

impl JsEditor {
    fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            collection: ImageCollection::new(config),
            codec: ImageCodec,
        })
    }

    fn export_with(
        &mut self,
        id: u64,
        kind: ExportKind,
        settings: Option<&CompressionSettings>,
    ) -> Result<JsExportArtifact, EditError> {
        self.collection
            .export_image(&self.codec, ImageId::new(id), kind, settings)
            .map(JsExportArtifact::immediate)
    }

    fn batch_with(
        &mut self,
        selection: Option<&[ImageId]>,
        settings: &CompressionSettings,
        mut on_progress: impl FnMut(usize, usize),
    ) -> JsBatchReport {
        let report = compress_batch(
            &mut self.collection,
            selection,
            &self.codec,
            settings,
            |progress| on_progress(progress.processed, progress.total),
        );

        let failures = report
            .failures
            .iter()
            .map(|f| (f.name.clone(), f.error.to_string()))
            .collect();
        let (processed, total) = (report.processed, report.total);
        let total_original_size = report.total_original_size();
        let total_output_size = report.total_output_size();
        let delay = self.collection.config().batch_delivery_delay_ms;

        JsBatchReport {
            deliveries: schedule_deliveries(report.into_artifacts(), delay),
            failures,
            processed,
            total,
            total_original_size,
            total_output_size,
        }
    }
}
