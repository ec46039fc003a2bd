//! Named one-click filter presets.

use serde::{Deserialize, Serialize};

use super::{EffectKind, EffectStack};

/// A named look. Selecting one replaces the whole effect stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterPreset {
    #[default]
    Original,
    BlackAndWhite,
    Vintage,
    Vivid,
    Cool,
    Warm,
    Dramatic,
    Fade,
    Soft,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 9] = [
        FilterPreset::Original,
        FilterPreset::BlackAndWhite,
        FilterPreset::Vintage,
        FilterPreset::Vivid,
        FilterPreset::Cool,
        FilterPreset::Warm,
        FilterPreset::Dramatic,
        FilterPreset::Fade,
        FilterPreset::Soft,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterPreset::Original => "Original",
            FilterPreset::BlackAndWhite => "B&W",
            FilterPreset::Vintage => "Vintage",
            FilterPreset::Vivid => "Vivid",
            FilterPreset::Cool => "Cool",
            FilterPreset::Warm => "Warm",
            FilterPreset::Dramatic => "Dramatic",
            FilterPreset::Fade => "Fade",
            FilterPreset::Soft => "Soft",
        }
    }

    /// Parse a display label or identifier, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|p| {
            p.label().eq_ignore_ascii_case(label)
                || format!("{p:?}").eq_ignore_ascii_case(label)
        })
    }

    /// The effect values this preset stands for.
    pub fn stack(self) -> EffectStack {
        use EffectKind::*;

        let base = EffectStack::default();
        match self {
            FilterPreset::Original => base,
            FilterPreset::BlackAndWhite => base.with(Saturation, 0.0).with(Contrast, 110.0),
            FilterPreset::Vintage => base
                .with(Brightness, 110.0)
                .with(Contrast, 90.0)
                .with(Saturation, 60.0)
                .with(Hue, -10.0),
            FilterPreset::Vivid => base.with(Contrast, 110.0).with(Saturation, 160.0),
            FilterPreset::Cool => base.with(Saturation, 90.0).with(Hue, 15.0),
            FilterPreset::Warm => base
                .with(Brightness, 105.0)
                .with(Saturation, 120.0)
                .with(Hue, -15.0),
            FilterPreset::Dramatic => base
                .with(Brightness, 90.0)
                .with(Contrast, 150.0)
                .with(Saturation, 80.0),
            FilterPreset::Fade => base
                .with(Brightness, 115.0)
                .with(Contrast, 80.0)
                .with(Saturation, 70.0),
            FilterPreset::Soft => base
                .with(Brightness, 105.0)
                .with(Contrast, 90.0)
                .with(Blur, 1.0),
        }
    }
}
