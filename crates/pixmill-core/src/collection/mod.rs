//! Image collection management.
//!
//! The collection is the single source of truth for which images are open,
//! which one is current, and what edits each one carries. It dispatches to the
//! transform, adjustment, text and compression modules for previews and
//! exports, and routes all pixel I/O through a [`Codec`](crate::codec::Codec).
//!
//! # Previews
//!
//! Preview rendering is split so a host can run the expensive part elsewhere:
//!
//! 1. [`ImageCollection::begin_preview`] snapshots the edit state and issues
//!    a sequence number.
//! 2. [`PreviewJob::run`] renders without touching the collection.
//! 3. [`ImageCollection::complete_preview`] installs the result unless a newer
//!    sequence is already showing.

mod batch;
mod export;
mod image;
mod manager;

pub use batch::{compress_batch, BatchEntry, BatchFailure, BatchProgress, BatchReport};
pub use export::{
    format_bytes, percent_saved, render_edits, schedule_deliveries, suggested_filename,
    ExportArtifact, ExportKind, ScheduledDelivery,
};
pub use image::{EditableImage, ImageId, ImageUpdate};
pub use manager::{
    load_image, ImageCollection, IngestFile, IngestRejection, IngestReport, PreviewJob,
    PreviewResult,
};
