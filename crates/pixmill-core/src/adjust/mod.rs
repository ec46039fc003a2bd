//! Non-destructive visual adjustments and filter presets.
//!
//! An image carries an [`Adjustments`] description, never adjusted pixels.
//! The description is rendered two ways:
//!
//! - **Preview**: [`Adjustments::preview_filter`] produces a CSS `filter`
//!   string for the host to apply on top of the preview bytes.
//! - **Export**: [`bake`] renders the same stack into pixels.
//!
//! Resetting returns to the default stack; because the preview bytes were
//! never touched by adjustments, the original image reappears exactly.

mod bake;
mod effects;
mod presets;
mod preview;

pub use bake::{apply_color_effects, bake};
pub use effects::{EffectDescriptor, EffectKind, EffectStack, MAX_BLUR_PX};
pub use presets::FilterPreset;
pub use preview::css_filter;

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// Pending adjustments for an image: a custom stack or a named preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Adjustments {
    Custom(EffectStack),
    Preset(FilterPreset),
}

impl Default for Adjustments {
    fn default() -> Self {
        Adjustments::Custom(EffectStack::default())
    }
}

impl Adjustments {
    /// The concrete effect values, resolving a preset.
    pub fn stack(&self) -> EffectStack {
        match self {
            Adjustments::Custom(stack) => *stack,
            Adjustments::Preset(preset) => preset.stack(),
        }
    }

    pub fn preset(&self) -> Option<FilterPreset> {
        match self {
            Adjustments::Preset(preset) => Some(*preset),
            Adjustments::Custom(_) => None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.stack().is_default()
    }

    /// Change one effect.
    ///
    /// An active preset is discarded and editing starts from the default
    /// stack.
    pub fn set_effect(&mut self, kind: EffectKind, value: f32) {
        let mut stack = match self {
            Adjustments::Custom(stack) => *stack,
            Adjustments::Preset(_) => EffectStack::default(),
        };
        stack.set(kind, value);
        *self = Adjustments::Custom(stack);
    }

    /// Same description with every custom value clamped into its range.
    pub fn sanitized(self) -> Self {
        match self {
            Adjustments::Custom(stack) => Adjustments::Custom(stack.sanitized()),
            preset @ Adjustments::Preset(_) => preset,
        }
    }

    /// Replace the whole description with `preset`.
    pub fn apply_preset(&mut self, preset: FilterPreset) {
        *self = Adjustments::Preset(preset);
    }

    pub fn reset(&mut self) {
        *self = Adjustments::default();
    }

    /// CSS filter string for the live preview.
    pub fn preview_filter(&self) -> String {
        css_filter(&self.stack())
    }

    /// Render into pixels for export.
    pub fn bake(&self, image: &DecodedImage) -> DecodedImage {
        bake(image, &self.stack())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preview_is_none() {
        assert_eq!(Adjustments::default().preview_filter(), "none");
    }

    #[test]
    fn test_preset_replaces_custom_values() {
        let mut adj = Adjustments::default();
        adj.set_effect(EffectKind::Brightness, 150.0);
        adj.apply_preset(FilterPreset::BlackAndWhite);

        assert_eq!(adj.preset(), Some(FilterPreset::BlackAndWhite));
        assert_eq!(adj.stack().brightness, 100.0);
        assert_eq!(adj.preview_filter(), "contrast(110%) saturate(0%)");
    }

    #[test]
    fn test_editing_discards_preset() {
        let mut adj = Adjustments::Preset(FilterPreset::Vivid);
        adj.set_effect(EffectKind::Hue, 20.0);

        assert_eq!(adj.preset(), None);
        assert_eq!(adj.stack(), EffectStack::default().with(EffectKind::Hue, 20.0));
    }

    #[test]
    fn test_reset_after_preset() {
        let mut adj = Adjustments::Preset(FilterPreset::Dramatic);
        adj.reset();
        assert!(adj.is_default());
        assert_eq!(adj.preset(), None);
    }

    #[test]
    fn test_sanitized_clamps_custom_values() {
        let mut stack = EffectStack::default();
        stack.brightness = 900.0;
        stack.contrast = f32::NAN;
        stack.hue = 720.0;

        let adj = Adjustments::Custom(stack).sanitized();
        assert_eq!(
            adj.stack(),
            EffectStack::default()
                .with(EffectKind::Brightness, 200.0)
                .with(EffectKind::Hue, 180.0)
        );

        let preset = Adjustments::Preset(FilterPreset::Fade);
        assert_eq!(preset.sanitized(), preset);
    }

    #[test]
    fn test_serde_shape() {
        let adj = Adjustments::Preset(FilterPreset::Warm);
        let json = serde_json::to_string(&adj).unwrap();
        assert_eq!(json, r#"{"type":"preset","value":"warm"}"#);

        let back: Adjustments = serde_json::from_str(&json).unwrap();
        assert_eq!(back, adj);
    }
}
