//! Text overlay description and validation.

use serde::{Deserialize, Serialize};

use super::TextError;

pub const MIN_FONT_SIZE_PX: u32 = 8;
pub const MAX_FONT_SIZE_PX: u32 = 512;

/// Horizontal alignment of each line relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// RGBA colour parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
pub fn parse_hex_color(input: &str) -> Result<Rgba, TextError> {
    let invalid = || TextError::InvalidColor(input.to_string());
    let hex = input.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
            Ok(Rgba {
                r: expand(0)?,
                g: expand(1)?,
                b: expand(2)?,
                a: 255,
            })
        }
        6 | 8 => Ok(Rgba {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
            a: if hex.len() == 8 { channel(&hex[6..8])? } else { 255 },
        }),
        _ => Err(invalid()),
    }
}

/// A text overlay as configured by the user.
///
/// Position is a percentage of the image it is drawn on, resolved at render
/// time, so the overlay follows crops and resizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOverlaySpec {
    pub text: String,
    /// Face requested by the user. Shown in the host's preview only.
    pub font_family: String,
    pub font_size_px: u32,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    pub position_x_percent: f32,
    pub position_y_percent: f32,
    pub opacity_percent: f32,
}

impl Default for TextOverlaySpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: "sans-serif".to_string(),
            font_size_px: 48,
            color: "#ffffff".to_string(),
            bold: false,
            italic: false,
            align: TextAlign::Center,
            position_x_percent: 50.0,
            position_y_percent: 50.0,
            opacity_percent: 100.0,
        }
    }
}

impl TextOverlaySpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Reject overlays that cannot render.
    pub fn validate(&self) -> Result<(), TextError> {
        if self.text.trim().is_empty() {
            return Err(TextError::EmptyText);
        }
        parse_hex_color(&self.color)?;
        Ok(())
    }

    pub fn clamped_font_size(&self) -> u32 {
        self.font_size_px.clamp(MIN_FONT_SIZE_PX, MAX_FONT_SIZE_PX)
    }

    /// Anchor position as fractions in `[0, 1]`.
    pub fn anchor_fraction(&self) -> (f32, f32) {
        (
            clamp_percent(self.position_x_percent) / 100.0,
            clamp_percent(self.position_y_percent) / 100.0,
        )
    }

    /// Opacity as a fraction in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        clamp_percent(self.opacity_percent) / 100.0
    }
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
