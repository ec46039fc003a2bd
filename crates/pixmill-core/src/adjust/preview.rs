//! CSS `filter` strings for live preview.
//!
//! The host applies the string to its preview element, so adjusting a slider
//! never touches pixels.

use super::{EffectKind, EffectStack};

/// CSS filter for `stack`, listing only non-default entries, or `"none"`.
pub fn css_filter(stack: &EffectStack) -> String {
    let parts: Vec<String> = stack
        .non_default()
        .into_iter()
        .map(|d| match d.kind {
            EffectKind::Brightness => format!("brightness({}%)", d.value),
            EffectKind::Contrast => format!("contrast({}%)", d.value),
            EffectKind::Saturation => format!("saturate({}%)", d.value),
            EffectKind::Hue => format!("hue-rotate({}deg)", d.value),
            EffectKind::Blur => format!("blur({}px)", d.value),
        })
        .collect();

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(" ")
    }
}
