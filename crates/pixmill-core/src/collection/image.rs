//! A single image in the collection and its edit state.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adjust::Adjustments;
use crate::decode::Dimensions;
use crate::text::TextOverlaySpec;
use crate::transform::Geometry;

/// Session-unique image handle. Ids are never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(u64);

impl ImageId {
    /// Handle for a raw id received from the host. Only ids issued by a
    /// collection refer to images.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An image loaded into the editor.
///
/// The original bytes never change after load and are the baseline every
/// render starts from. Edit state is a description (geometry, adjustments,
/// text) applied on demand.
#[derive(Debug, Clone)]
pub struct EditableImage {
    id: ImageId,
    pub name: String,
    mime_type: String,
    original_bytes: Arc<[u8]>,
    original_dimensions: Dimensions,

    preview_bytes: Arc<[u8]>,
    preview_mime_type: String,
    preview_dimensions: Dimensions,

    pub(crate) adjustments: Adjustments,
    pub(crate) geometry: Geometry,
    pub(crate) text_overlay: Option<TextOverlaySpec>,
    /// Size of the most recent artifact: the original, then the last export.
    pub(crate) byte_size: usize,

    /// Last sequence handed to a preview job.
    pub(crate) issued_sequence: u64,
    /// Sequence of the preview currently shown.
    pub(crate) applied_sequence: u64,
}

impl EditableImage {
    pub(crate) fn new(
        id: ImageId,
        name: String,
        mime_type: String,
        bytes: Arc<[u8]>,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            id,
            name,
            preview_mime_type: mime_type.clone(),
            mime_type,
            byte_size: bytes.len(),
            preview_bytes: Arc::clone(&bytes),
            original_bytes: bytes,
            original_dimensions: dimensions,
            preview_dimensions: dimensions,
            adjustments: Adjustments::default(),
            geometry: Geometry::default(),
            text_overlay: None,
            issued_sequence: 0,
            applied_sequence: 0,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn original_bytes(&self) -> &Arc<[u8]> {
        &self.original_bytes
    }

    pub fn original_dimensions(&self) -> Dimensions {
        self.original_dimensions
    }

    /// Dimensions after the pending geometry.
    pub fn current_dimensions(&self) -> Dimensions {
        self.geometry.output_dimensions(self.original_dimensions)
    }

    pub fn preview_bytes(&self) -> &Arc<[u8]> {
        &self.preview_bytes
    }

    pub fn preview_mime_type(&self) -> &str {
        &self.preview_mime_type
    }

    pub fn preview_dimensions(&self) -> Dimensions {
        self.preview_dimensions
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn text_overlay(&self) -> Option<&TextOverlaySpec> {
        self.text_overlay.as_ref()
    }

    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// CSS filter the host should apply over the preview bytes.
    pub fn preview_filter(&self) -> String {
        self.adjustments.preview_filter()
    }

    /// True when previews need no rendering: the original bytes are exact.
    pub fn preview_is_original(&self) -> bool {
        self.geometry.is_identity() && self.text_overlay.is_none()
    }

    pub(crate) fn set_preview(&mut self, bytes: Arc<[u8]>, mime_type: String, dims: Dimensions) {
        self.preview_bytes = bytes;
        self.preview_mime_type = mime_type;
        self.preview_dimensions = dims;
    }

    /// Show the original bytes again and drop any preview still in flight.
    pub(crate) fn restore_original_preview(&mut self) {
        self.preview_bytes = Arc::clone(&self.original_bytes);
        self.preview_mime_type = self.mime_type.clone();
        self.preview_dimensions = self.original_dimensions;
        self.issued_sequence += 1;
        self.applied_sequence = self.issued_sequence;
    }
}

/// Partial edit applied by [`ImageCollection::update_image`].
///
/// [`ImageCollection::update_image`]: super::ImageCollection::update_image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageUpdate {
    pub name: Option<String>,
    pub adjustments: Option<Adjustments>,
    pub geometry: Option<Geometry>,
    /// `Some(None)` removes the overlay.
    pub text_overlay: Option<Option<TextOverlaySpec>>,
}

impl ImageUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn adjustments(mut self, adjustments: Adjustments) -> Self {
        self.adjustments = Some(adjustments);
        self
    }

    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn text_overlay(mut self, overlay: Option<TextOverlaySpec>) -> Self {
        self.text_overlay = Some(overlay);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Orientation;

    fn sample() -> EditableImage {
        EditableImage::new(
            ImageId::new(7),
            "cat.png".into(),
            "image/png".into(),
            Arc::from(vec![1u8, 2, 3]),
            Dimensions::new(40, 30),
        )
    }

    #[test]
    fn test_new_image_previews_original() {
        let img = sample();
        assert!(img.preview_is_original());
        assert_eq!(img.preview_bytes(), img.original_bytes());
        assert_eq!(img.byte_size(), 3);
        assert_eq!(img.preview_filter(), "none");
    }

    #[test]
    fn test_current_dimensions_follow_geometry() {
        let mut img = sample();
        img.geometry.orientation = Orientation {
            rotation: 90,
            ..Default::default()
        };
        assert_eq!(img.current_dimensions(), Dimensions::new(30, 40));
        assert_eq!(img.original_dimensions(), Dimensions::new(40, 30));
    }

    #[test]
    fn test_restore_original_preview() {
        let mut img = sample();
        img.issued_sequence = 4;
        img.set_preview(Arc::from(vec![9u8]), "image/png".into(), Dimensions::new(1, 1));
        img.restore_original_preview();
        assert_eq!(&img.preview_bytes()[..], &[1, 2, 3]);
        assert_eq!(img.applied_sequence, 5);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ImageId::new(42).to_string(), "42");
    }
}
