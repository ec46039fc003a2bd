//! Combined geometry state for one image.

use serde::{Deserialize, Serialize};

use super::{
    apply_crop, apply_orientation, resize_image, CropRect, Orientation, TransformError,
};
use crate::decode::{DecodedImage, Dimensions, FilterType};

/// Crop, orientation and resize target for an image.
///
/// The resize target is expressed in the oriented frame: it is what the
/// user typed into the resize tool while looking at the rotated image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Geometry {
    pub crop: Option<CropRect>,
    pub orientation: Orientation,
    pub resize: Option<Dimensions>,
}

impl Geometry {
    pub fn is_identity(&self) -> bool {
        self.crop.map_or(true, |c| c.is_full())
            && self.orientation.is_identity()
            && self.resize.is_none()
    }

    pub fn rotate_right(&mut self) {
        self.orientation.rotate_right();
        self.swap_resize_target();
    }

    pub fn rotate_left(&mut self) {
        self.orientation.rotate_left();
        self.swap_resize_target();
    }

    fn swap_resize_target(&mut self) {
        if let Some(target) = self.resize.as_mut() {
            *target = target.swapped();
        }
    }

    /// Dimensions the rendered image will have, given the source dimensions.
    pub fn output_dimensions(&self, source: Dimensions) -> Dimensions {
        if let Some(target) = self.resize {
            return target;
        }
        let cropped = match self.crop {
            Some(rect) => rect.output_dimensions(source),
            None => source,
        };
        self.orientation.oriented_dimensions(cropped)
    }

    /// Render crop, then orientation, then resize.
    pub fn apply(
        &self,
        image: &DecodedImage,
        filter: FilterType,
    ) -> Result<DecodedImage, TransformError> {
        if let Some(rect) = &self.crop {
            rect.validate()?;
        }

        let cropped = match &self.crop {
            Some(rect) => apply_crop(image, rect),
            None => image.clone(),
        };
        let oriented = apply_orientation(&cropped, &self.orientation);

        match self.resize {
            Some(target) => resize_image(&oriented, target.width, target.height, filter),
            None => Ok(oriented),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![90; (width * height * 3) as usize])
    }

    #[test]
    fn test_default_is_identity() {
        let geometry = Geometry::default();
        assert!(geometry.is_identity());
        let img = gray(4, 3);
        assert_eq!(geometry.apply(&img, FilterType::Bilinear).unwrap(), img);
    }

    #[test]
    fn test_pipeline_order_and_dimensions() {
        let geometry = Geometry {
            crop: Some(CropRect::new(0.0, 0.0, 0.5, 1.0)),
            orientation: Orientation {
                rotation: 90,
                ..Default::default()
            },
            resize: None,
        };
        let source = Dimensions::new(200, 100);
        // Half-width crop gives 100x100, which the quarter turn leaves square.
        assert_eq!(geometry.output_dimensions(source), Dimensions::new(100, 100));

        let out = geometry.apply(&gray(200, 80), FilterType::Bilinear).unwrap();
        assert_eq!((out.width, out.height), (80, 100));
    }

    #[test]
    fn test_rotation_swaps_resize_target() {
        let mut geometry = Geometry {
            resize: Some(Dimensions::new(1280, 720)),
            ..Default::default()
        };
        geometry.rotate_right();
        assert_eq!(geometry.resize, Some(Dimensions::new(720, 1280)));
        geometry.rotate_left();
        assert_eq!(geometry.resize, Some(Dimensions::new(1280, 720)));
    }

    #[test]
    fn test_resize_applied_last() {
        let geometry = Geometry {
            crop: None,
            orientation: Orientation {
                rotation: -90,
                ..Default::default()
            },
            resize: Some(Dimensions::new(30, 60)),
        };
        let out = geometry.apply(&gray(120, 60), FilterType::Nearest).unwrap();
        assert_eq!((out.width, out.height), (30, 60));
    }

    #[test]
    fn test_invalid_crop_rejected() {
        let geometry = Geometry {
            crop: Some(CropRect::new(0.0, 0.0, -1.0, 1.0)),
            ..Default::default()
        };
        assert_eq!(
            geometry.apply(&gray(2, 2), FilterType::Bilinear),
            Err(TransformError::InvalidCrop)
        );
    }
}
