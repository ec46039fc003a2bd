//! Pixel-space rendering of the effect stack for export.
//!
//! Colour effects use the same per-channel formulas and 3x3 matrices as the
//! CSS `brightness`, `contrast`, `saturate` and `hue-rotate` filter functions,
//! each clamped to `[0, 1]` before the next, so the baked result matches the
//! live preview. Blur is a Gaussian with the blur value as its standard
//! deviation, like CSS `blur()`.

use super::EffectStack;
use crate::decode::DecodedImage;

type Matrix = [[f32; 3]; 3];

/// Render `stack` onto a copy of `image`.
///
/// A default stack returns the input unchanged.
///
/// # Example
/// ```
/// use pixmill_core::adjust::{bake, EffectKind, EffectStack};
/// use pixmill_core::decode::DecodedImage;
///
/// let image = DecodedImage::new(1, 1, vec![100, 100, 100]);
/// let stack = EffectStack::new().with(EffectKind::Brightness, 200.0);
/// assert_eq!(bake(&image, &stack).pixels, vec![200, 200, 200]);
/// ```
pub fn bake(image: &DecodedImage, stack: &EffectStack) -> DecodedImage {
    if stack.is_default() {
        return image.clone();
    }

    let mut output = image.clone();
    apply_color_effects(&mut output.pixels, stack);

    if stack.blur > 0.0 {
        if let Some(rgb) = output.to_rgb_image() {
            output = DecodedImage::from_rgb_image(image::imageops::blur(&rgb, stack.blur));
        }
    }

    output
}

/// Apply brightness, contrast, saturation and hue rotation in place.
pub fn apply_color_effects(pixels: &mut [u8], stack: &EffectStack) {
    let brightness = stack.brightness / 100.0;
    let contrast = stack.contrast / 100.0;
    let saturate = (stack.saturation != 100.0).then(|| saturate_matrix(stack.saturation / 100.0));
    let hue = (stack.hue != 0.0).then(|| hue_rotate_matrix(stack.hue));

    if brightness == 1.0 && contrast == 1.0 && saturate.is_none() && hue.is_none() {
        return;
    }

    for chunk in pixels.chunks_exact_mut(3) {
        let mut rgb = [
            chunk[0] as f32 / 255.0,
            chunk[1] as f32 / 255.0,
            chunk[2] as f32 / 255.0,
        ];

        if brightness != 1.0 {
            rgb = rgb.map(|c| (c * brightness).clamp(0.0, 1.0));
        }
        if contrast != 1.0 {
            let intercept = 0.5 - 0.5 * contrast;
            rgb = rgb.map(|c| (c * contrast + intercept).clamp(0.0, 1.0));
        }
        if let Some(m) = &saturate {
            rgb = multiply(m, rgb);
        }
        if let Some(m) = &hue {
            rgb = multiply(m, rgb);
        }

        for (out, c) in chunk.iter_mut().zip(rgb) {
            *out = (c * 255.0).round() as u8;
        }
    }
}

#[inline]
fn multiply(m: &Matrix, [r, g, b]: [f32; 3]) -> [f32; 3] {
    [
        (m[0][0] * r + m[0][1] * g + m[0][2] * b).clamp(0.0, 1.0),
        (m[1][0] * r + m[1][1] * g + m[1][2] * b).clamp(0.0, 1.0),
        (m[2][0] * r + m[2][1] * g + m[2][2] * b).clamp(0.0, 1.0),
    ]
}

/// `saturate(s)` where `s = 1.0` is identity.
fn saturate_matrix(s: f32) -> Matrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

/// `hue-rotate(degrees)`.
fn hue_rotate_matrix(degrees: f32) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjust::EffectKind;

    fn solid(r: u8, g: u8, b: u8, width: u32, height: u32) -> DecodedImage {
        let pixels = [r, g, b].repeat((width * height) as usize);
        DecodedImage::new(width, height, pixels)
    }

    fn close(a: u8, b: u8) -> bool {
        (a as i16 - b as i16).abs() <= 1
    }

    #[test]
    fn test_default_stack_is_identity() {
        let img = solid(12, 34, 56, 3, 2);
        assert_eq!(bake(&img, &EffectStack::default()), img);
    }

    #[test]
    fn test_brightness_scales_and_clamps() {
        let img = DecodedImage::new(2, 1, vec![100, 50, 0, 200, 255, 10]);
        let stack = EffectStack::new().with(EffectKind::Brightness, 200.0);
        assert_eq!(bake(&img, &stack).pixels, vec![200, 100, 0, 255, 255, 20]);
    }

    #[test]
    fn test_zero_contrast_is_mid_gray() {
        let img = DecodedImage::new(2, 1, vec![0, 90, 255, 30, 60, 200]);
        let stack = EffectStack::new().with(EffectKind::Contrast, 0.0);
        assert!(bake(&img, &stack).pixels.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let img = solid(255, 0, 0, 1, 1);
        let stack = EffectStack::new().with(EffectKind::Saturation, 0.0);
        let out = bake(&img, &stack);
        assert_eq!(out.pixels[0], out.pixels[1]);
        assert_eq!(out.pixels[1], out.pixels[2]);
        assert!(close(out.pixels[0], 54));
    }

    #[test]
    fn test_hue_rotate_leaves_gray_alone() {
        let img = solid(100, 100, 100, 1, 1);
        let stack = EffectStack::new().with(EffectKind::Hue, 180.0);
        let out = bake(&img, &stack);
        assert!(out.pixels.iter().all(|&v| close(v, 100)));
    }

    #[test]
    fn test_hue_rotate_changes_color() {
        let img = solid(255, 0, 0, 1, 1);
        let stack = EffectStack::new().with(EffectKind::Hue, 120.0);
        let out = bake(&img, &stack);
        // Red rotated by a third of a turn is dominated by green.
        assert!(out.pixels[1] > out.pixels[0]);
        assert!(out.pixels[1] > out.pixels[2]);
    }

    #[test]
    fn test_blur_softens_edges() {
        let mut pixels = Vec::new();
        for _y in 0..8 {
            for x in 0..8 {
                let v = if x < 4 { 0 } else { 255 };
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        let img = DecodedImage::new(8, 8, pixels);
        let stack = EffectStack::new().with(EffectKind::Blur, 2.0);
        let out = bake(&img, &stack);

        assert_eq!((out.width, out.height), (8, 8));
        // Pixel just left of the edge picks up brightness from the right half.
        let idx = (4 * 8 + 3) * 3;
        assert!(out.pixels[idx] > 0);
        assert!(out.pixels[idx] < 255);
    }

    #[test]
    fn test_bake_is_deterministic() {
        let img = DecodedImage::new(4, 1, (0..12).map(|v| v * 20).collect());
        let stack = EffectStack::new()
            .with(EffectKind::Brightness, 130.0)
            .with(EffectKind::Hue, 45.0)
            .with(EffectKind::Blur, 1.0);
        assert_eq!(bake(&img, &stack), bake(&img, &stack));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::adjust::EffectKind;
    use proptest::prelude::*;

    proptest! {
        /// Colour effects keep the buffer length and never panic.
        #[test]
        fn prop_color_effects_preserve_length(
            pixels in prop::collection::vec(any::<u8>(), 0..300usize).prop_map(|mut v| { v.truncate(v.len() / 3 * 3); v }),
            brightness in 0.0f32..200.0,
            contrast in 0.0f32..200.0,
            saturation in 0.0f32..200.0,
            hue in -180.0f32..180.0,
        ) {
            let stack = EffectStack::new()
                .with(EffectKind::Brightness, brightness)
                .with(EffectKind::Contrast, contrast)
                .with(EffectKind::Saturation, saturation)
                .with(EffectKind::Hue, hue);
            let mut out = pixels.clone();
            apply_color_effects(&mut out, &stack);
            prop_assert_eq!(out.len(), pixels.len());
        }
    }
}
