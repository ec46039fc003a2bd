//! The effect stack: five independent visual adjustments.
//!
//! ## Stack Order
//! 1. Brightness
//! 2. Contrast
//! 3. Saturation
//! 4. Hue rotation
//! 5. Blur
//!
//! The order is fixed and is the same for the CSS preview and the baked
//! export, so both render the same composition.

use serde::{Deserialize, Serialize};

/// Largest blur radius accepted, in pixels.
pub const MAX_BLUR_PX: f32 = 50.0;

/// One adjustable effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    /// Percent, 0-200, default 100.
    Brightness,
    /// Percent, 0-200, default 100.
    Contrast,
    /// Percent, 0-200, default 100.
    Saturation,
    /// Degrees, -180 to 180, default 0.
    Hue,
    /// Pixels, 0 to [`MAX_BLUR_PX`], default 0.
    Blur,
}

impl EffectKind {
    /// All kinds in stack order.
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Brightness,
        EffectKind::Contrast,
        EffectKind::Saturation,
        EffectKind::Hue,
        EffectKind::Blur,
    ];

    /// Inclusive `(min, max)` accepted for this kind.
    pub fn range(self) -> (f32, f32) {
        match self {
            EffectKind::Brightness | EffectKind::Contrast | EffectKind::Saturation => (0.0, 200.0),
            EffectKind::Hue => (-180.0, 180.0),
            EffectKind::Blur => (0.0, MAX_BLUR_PX),
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            EffectKind::Brightness | EffectKind::Contrast | EffectKind::Saturation => 100.0,
            EffectKind::Hue | EffectKind::Blur => 0.0,
        }
    }

    /// Clamp `value` into range. NaN falls back to the default.
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default_value();
        }
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

/// A single `(kind, value)` entry of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    pub value: f32,
}

/// Values for every effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectStack {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub hue: f32,
    pub blur: f32,
}

impl Default for EffectStack {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            hue: 0.0,
            blur: 0.0,
        }
    }
}

impl EffectStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: EffectKind) -> f32 {
        match kind {
            EffectKind::Brightness => self.brightness,
            EffectKind::Contrast => self.contrast,
            EffectKind::Saturation => self.saturation,
            EffectKind::Hue => self.hue,
            EffectKind::Blur => self.blur,
        }
    }

    /// Set one effect, clamping into its range.
    pub fn set(&mut self, kind: EffectKind, value: f32) {
        let value = kind.clamp(value);
        match kind {
            EffectKind::Brightness => self.brightness = value,
            EffectKind::Contrast => self.contrast = value,
            EffectKind::Saturation => self.saturation = value,
            EffectKind::Hue => self.hue = value,
            EffectKind::Blur => self.blur = value,
        }
    }

    /// Builder form of [`EffectStack::set`].
    pub fn with(mut self, kind: EffectKind, value: f32) -> Self {
        self.set(kind, value);
        self
    }

    /// Clamp every field. Used after deserializing host input.
    pub fn sanitized(mut self) -> Self {
        for kind in EffectKind::ALL {
            self.set(kind, self.get(kind));
        }
        self
    }

    pub fn is_default(&self) -> bool {
        EffectKind::ALL
            .iter()
            .all(|&kind| self.get(kind) == kind.default_value())
    }

    /// Entries that differ from their defaults, in stack order.
    pub fn non_default(&self) -> Vec<EffectDescriptor> {
        EffectKind::ALL
            .iter()
            .filter(|&&kind| self.get(kind) != kind.default_value())
            .map(|&kind| EffectDescriptor {
                kind,
                value: self.get(kind),
            })
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stack() {
        let stack = EffectStack::default();
        assert!(stack.is_default());
        assert!(stack.non_default().is_empty());
    }

    #[test]
    fn test_set_clamps() {
        let mut stack = EffectStack::new();
        stack.set(EffectKind::Brightness, 250.0);
        stack.set(EffectKind::Hue, -400.0);
        stack.set(EffectKind::Blur, 80.0);
        stack.set(EffectKind::Contrast, f32::NAN);

        assert_eq!(stack.brightness, 200.0);
        assert_eq!(stack.hue, -180.0);
        assert_eq!(stack.blur, MAX_BLUR_PX);
        assert_eq!(stack.contrast, 100.0);
    }

    #[test]
    fn test_non_default_in_stack_order() {
        let stack = EffectStack::new()
            .with(EffectKind::Blur, 2.0)
            .with(EffectKind::Brightness, 120.0);

        let kinds: Vec<_> = stack.non_default().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![EffectKind::Brightness, EffectKind::Blur]);
    }

    #[test]
    fn test_reset() {
        let mut stack = EffectStack::new().with(EffectKind::Saturation, 0.0);
        assert!(!stack.is_default());
        stack.reset();
        assert!(stack.is_default());
    }

    #[test]
    fn test_sanitized_host_input() {
        let stack: EffectStack =
            serde_json::from_str(r#"{"brightness": 900, "hue": 30}"#).unwrap();
        let stack = stack.sanitized();
        assert_eq!(stack.brightness, 200.0);
        assert_eq!(stack.hue, 30.0);
        assert_eq!(stack.contrast, 100.0);
    }
}
