//! Bitmap-font text rasterization.
//!
//! Glyphs come from the 8x8 `font8x8` tables, scaled by nearest neighbour to
//! the requested size. A coverage mask is built first and each covered pixel
//! is blended exactly once, so overlapping strokes never darken.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

use super::overlay::{parse_hex_color, TextAlign, TextOverlaySpec};
use super::TextError;
use crate::decode::{DecodedImage, Dimensions};

const GLYPH_CELLS: u32 = 8;
/// Horizontal offset per row for italics: one pixel every five rows.
const ITALIC_SLANT: f32 = 0.2;

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Pixel layout derived from a spec.
#[derive(Debug, Clone, Copy)]
struct Metrics {
    scale: u32,
    line_gap: u32,
    bold_extra: u32,
}

impl Metrics {
    fn for_spec(spec: &TextOverlaySpec) -> Self {
        let scale = (spec.clamped_font_size() as f32 / GLYPH_CELLS as f32)
            .round()
            .max(1.0) as u32;
        Self {
            scale,
            line_gap: scale * 2,
            bold_extra: if spec.bold { scale.div_ceil(4) } else { 0 },
        }
    }

    fn glyph_size(&self) -> u32 {
        GLYPH_CELLS * self.scale
    }

    fn line_width(&self, line: &str) -> u32 {
        line.chars().count() as u32 * self.glyph_size()
    }
}

/// Size of the rendered text block, before italic slant and bold widening.
pub fn measure_text(spec: &TextOverlaySpec) -> Dimensions {
    let metrics = Metrics::for_spec(spec);
    let lines: Vec<&str> = spec.text.split('\n').collect();
    let width = lines.iter().map(|l| metrics.line_width(l)).max().unwrap_or(0);
    let count = lines.len() as u32;
    let height = count * metrics.glyph_size() + count.saturating_sub(1) * metrics.line_gap;
    Dimensions::new(width, height)
}

/// Draw `spec` onto a copy of `image`.
///
/// The anchor is `position_{x,y}_percent` of the image's current size. Lines
/// are aligned horizontally around the anchor and the block is centered on it
/// vertically. Identical inputs always produce identical pixels.
pub fn render_text_overlay(
    image: &DecodedImage,
    spec: &TextOverlaySpec,
) -> Result<DecodedImage, TextError> {
    spec.validate()?;
    let color = parse_hex_color(&spec.color)?;

    let mut output = image.clone();
    let alpha = spec.opacity() * color.a as f32 / 255.0;
    if alpha <= 0.0 || image.is_empty() {
        return Ok(output);
    }

    let mask = coverage_mask(spec, image.width, image.height);
    let ink = [color.r as f32, color.g as f32, color.b as f32];

    for (covered, px) in mask.iter().zip(output.pixels.chunks_exact_mut(3)) {
        if !covered {
            continue;
        }
        for (channel, &value) in px.iter_mut().zip(&ink) {
            let blended = *channel as f32 * (1.0 - alpha) + value * alpha;
            *channel = blended.round().clamp(0.0, 255.0) as u8;
        }
    }

    Ok(output)
}

fn coverage_mask(spec: &TextOverlaySpec, width: u32, height: u32) -> Vec<bool> {
    let metrics = Metrics::for_spec(spec);
    let block = measure_text(spec);
    let (fx, fy) = spec.anchor_fraction();
    let anchor_x = (fx * width as f32).round() as i64;
    let anchor_y = (fy * height as f32).round() as i64;

    let mut mask = vec![false; width as usize * height as usize];
    let mut mark = |x: i64, y: i64| {
        if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
            mask[y as usize * width as usize + x as usize] = true;
        }
    };

    let glyph_size = metrics.glyph_size() as i64;
    let scale = metrics.scale as i64;
    let mut line_top = anchor_y - block.height as i64 / 2;

    for line in spec.text.split('\n') {
        let line_width = metrics.line_width(line) as i64;
        let mut cursor_x = match spec.align {
            TextAlign::Left => anchor_x,
            TextAlign::Center => anchor_x - line_width / 2,
            TextAlign::Right => anchor_x - line_width,
        };

        for ch in line.chars() {
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..GLYPH_CELLS as i64 {
                    if (bits >> col) & 1 == 0 {
                        continue;
                    }
                    let base_x = cursor_x + col * scale;
                    let base_y = line_top + row as i64 * scale;
                    for dy in 0..scale {
                        let y = base_y + dy;
                        let slant = if spec.italic {
                            ((glyph_size - 1 - (y - line_top)) as f32 * ITALIC_SLANT).round() as i64
                        } else {
                            0
                        };
                        for dx in 0..scale + metrics.bold_extra as i64 {
                            mark(base_x + dx + slant, y);
                        }
                    }
                }
            }
            cursor_x += glyph_size;
        }

        line_top += glyph_size + metrics.line_gap as i64;
    }

    mask
}
