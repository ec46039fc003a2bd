//! Quarter-turn rotation and flip bookkeeping.
//!
//! Rotation accumulates in 90° steps and is kept in `(-360, 360)` with its
//! sign preserved: rotating left from 0 gives -90, not 270. Only the magnitude
//! matters for deciding whether width and height swap.
//!
//! # Composition
//!
//! Rendering mirrors a 2D canvas draw: translate to the center, rotate, scale
//! by `(±1, ±1)` for the flips, then draw the source centered. Because the
//! scale is applied inside the rotated frame, the flip acts on the source
//! image before it is rotated.

use serde::{Deserialize, Serialize};

use crate::decode::{DecodedImage, Dimensions};

/// Accumulated rotation plus independent flip toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Orientation {
    /// Degrees, a multiple of 90 in `(-360, 360)`. Positive is clockwise.
    pub rotation: i32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Orientation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotate 90° clockwise.
    pub fn rotate_right(&mut self) {
        self.rotation = (self.rotation + 90) % 360;
    }

    /// Rotate 90° counter-clockwise.
    pub fn rotate_left(&mut self) {
        self.rotation = (self.rotation - 90) % 360;
    }

    pub fn toggle_flip_horizontal(&mut self) {
        self.flip_horizontal = !self.flip_horizontal;
    }

    pub fn toggle_flip_vertical(&mut self) {
        self.flip_vertical = !self.flip_vertical;
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == 0 && !self.flip_horizontal && !self.flip_vertical
    }

    /// True when `|rotation|` is 90 or 270.
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self.rotation.abs(), 90 | 270)
    }

    /// Dimensions of a `source`-sized image after this orientation.
    pub fn oriented_dimensions(&self, source: Dimensions) -> Dimensions {
        if self.swaps_dimensions() {
            source.swapped()
        } else {
            source
        }
    }

    /// Clockwise quarter turns in `0..4`.
    fn clockwise_turns(&self) -> u32 {
        (self.rotation.rem_euclid(360) / 90) as u32
    }
}

/// Render `image` with the given orientation.
///
/// Flips are applied in the source frame, then the result is rotated.
pub fn apply_orientation(image: &DecodedImage, orientation: &Orientation) -> DecodedImage {
    if orientation.is_identity() {
        return image.clone();
    }

    let Some(mut rgb) = image.to_rgb_image() else {
        return image.clone();
    };

    if orientation.flip_horizontal {
        image::imageops::flip_horizontal_in_place(&mut rgb);
    }
    if orientation.flip_vertical {
        image::imageops::flip_vertical_in_place(&mut rgb);
    }

    let rotated = match orientation.clockwise_turns() {
        1 => image::imageops::rotate90(&rgb),
        2 => image::imageops::rotate180(&rgb),
        3 => image::imageops::rotate270(&rgb),
        _ => rgb,
    };

    DecodedImage::from_rgb_image(rotated)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [u8; 3] = [255, 0, 0];
    const B: [u8; 3] = [0, 0, 255];

    fn two_by_one() -> DecodedImage {
        DecodedImage::new(2, 1, [A, B].concat())
    }

    #[test]
    fn test_rotation_keeps_sign() {
        let mut o = Orientation::new();
        o.rotate_left();
        assert_eq!(o.rotation, -90);
        o.rotate_left();
        o.rotate_left();
        assert_eq!(o.rotation, -270);
        o.rotate_left();
        assert_eq!(o.rotation, 0);
    }

    #[test]
    fn test_mixed_directions() {
        let mut o = Orientation::new();
        o.rotate_left();
        o.rotate_right();
        o.rotate_right();
        assert_eq!(o.rotation, 90);
    }

    #[test]
    fn test_three_right_turns_swap_dimensions() {
        let mut o = Orientation::new();
        for _ in 0..3 {
            o.rotate_right();
        }
        assert_eq!(o.rotation, 270);
        assert_eq!(
            o.oriented_dimensions(Dimensions::new(1920, 1080)),
            Dimensions::new(1080, 1920)
        );
    }

    #[test]
    fn test_negative_rotation_swaps() {
        let mut o = Orientation::new();
        o.rotate_left();
        assert!(o.swaps_dimensions());
        o.rotate_left();
        assert!(!o.swaps_dimensions());
    }

    #[test]
    fn test_apply_quarter_turn_clockwise() {
        let out = apply_orientation(
            &two_by_one(),
            &Orientation {
                rotation: 90,
                ..Default::default()
            },
        );
        assert_eq!((out.width, out.height), (1, 2));
        assert_eq!(out.pixels, [A, B].concat());
    }

    #[test]
    fn test_left_turn_matches_three_right_turns() {
        let img = DecodedImage::new(3, 2, (0..18).collect());
        let left = Orientation {
            rotation: -90,
            ..Default::default()
        };
        let right3 = Orientation {
            rotation: 270,
            ..Default::default()
        };
        assert_eq!(apply_orientation(&img, &left), apply_orientation(&img, &right3));
    }

    #[test]
    fn test_flip_applies_before_rotation() {
        let o = Orientation {
            rotation: 90,
            flip_horizontal: true,
            flip_vertical: false,
        };
        let out = apply_orientation(&two_by_one(), &o);
        // Flipped first ([B, A]) then rotated clockwise into a column.
        assert_eq!((out.width, out.height), (1, 2));
        assert_eq!(out.pixels, [B, A].concat());
    }

    #[test]
    fn test_flip_vertical_in_rotated_frame() {
        let img = DecodedImage::new(1, 2, [A, B].concat());
        let o = Orientation {
            rotation: 90,
            flip_horizontal: false,
            flip_vertical: true,
        };
        let out = apply_orientation(&img, &o);
        // Column [A; B] flipped to [B; A], then rotated clockwise into a row [A, B].
        assert_eq!((out.width, out.height), (2, 1));
        assert_eq!(out.pixels, [A, B].concat());
    }

    #[test]
    fn test_identity_is_a_copy() {
        let img = two_by_one();
        assert_eq!(apply_orientation(&img, &Orientation::new()), img);
    }
}
