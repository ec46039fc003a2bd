//! Sequential bulk compression over a selection of images.

use log::{info, warn};
use serde::Serialize;

use super::export::{percent_saved, ExportArtifact, ExportKind};
use super::image::ImageId;
use super::manager::ImageCollection;
use crate::codec::Codec;
use crate::compress::CompressionSettings;
use crate::error::EditError;

/// Progress after each item, successful or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
}

/// A successfully compressed item.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub image_id: ImageId,
    pub name: String,
    pub original_size: usize,
    pub output_size: usize,
    pub percent_saved: f64,
    pub artifact: ExportArtifact,
}

/// An item that failed. The rest of the batch still runs.
#[derive(Debug)]
pub struct BatchFailure {
    pub image_id: ImageId,
    pub name: String,
    pub error: EditError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub failures: Vec<BatchFailure>,
    pub processed: usize,
    pub total: usize,
}

impl BatchReport {
    pub fn total_original_size(&self) -> usize {
        self.entries.iter().map(|e| e.original_size).sum()
    }

    pub fn total_output_size(&self) -> usize {
        self.entries.iter().map(|e| e.output_size).sum()
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &ExportArtifact> {
        self.entries.iter().map(|e| &e.artifact)
    }

    pub fn into_artifacts(self) -> Vec<ExportArtifact> {
        self.entries.into_iter().map(|e| e.artifact).collect()
    }
}

/// Compress the selected images (all images when `selection` is `None`)
/// one at a time, in collection order.
///
/// `progress` is called after every item. Unknown ids in the selection are
/// ignored.
pub fn compress_batch<C, F>(
    collection: &mut ImageCollection,
    selection: Option<&[ImageId]>,
    codec: &C,
    settings: &CompressionSettings,
    mut progress: F,
) -> BatchReport
where
    C: Codec,
    F: FnMut(BatchProgress),
{
    let queue: Vec<ImageId> = collection
        .ids()
        .into_iter()
        .filter(|id| selection.map_or(true, |s| s.contains(id)))
        .collect();

    let mut report = BatchReport {
        total: queue.len(),
        ..Default::default()
    };

    for id in queue {
        let (name, original_size) = match collection.get(id) {
            Some(image) => (image.name.clone(), image.original_bytes().len()),
            None => continue,
        };

        match collection.export_image(codec, id, ExportKind::Compressed, Some(settings)) {
            Ok(artifact) => {
                let output_size = artifact.byte_length();
                report.entries.push(BatchEntry {
                    image_id: id,
                    name,
                    original_size,
                    output_size,
                    percent_saved: percent_saved(original_size, output_size),
                    artifact,
                });
            }
            Err(error) => {
                warn!("batch item {name} failed: {error}");
                report.failures.push(BatchFailure {
                    image_id: id,
                    name,
                    error,
                });
            }
        }

        report.processed += 1;
        progress(BatchProgress {
            processed: report.processed,
            total: report.total,
        });
    }

    info!(
        "batch done: {} compressed, {} failed",
        report.entries.len(),
        report.failures.len()
    );
    report
}
