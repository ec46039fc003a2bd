//! Effect stack and filter preset bindings.
//!
//! The stack is passed from TypeScript as a plain object
//! (`{ brightness, contrast, saturation, hue, blur }`) via serde_wasm_bindgen.

use pixmill_core::adjust::{bake, EffectKind, EffectStack, FilterPreset};
use wasm_bindgen::prelude::*;

use crate::types::{js_error, JsDecodedImage};

pub(crate) fn effect_kind_from_name(name: &str) -> Option<EffectKind> {
    match name.trim().to_ascii_lowercase().as_str() {
        "brightness" => Some(EffectKind::Brightness),
        "contrast" => Some(EffectKind::Contrast),
        "saturation" | "saturate" => Some(EffectKind::Saturation),
        "hue" | "hue-rotate" => Some(EffectKind::Hue),
        "blur" => Some(EffectKind::Blur),
        _ => None,
    }
}

fn stack_from_js(value: JsValue) -> Result<EffectStack, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EffectStack::default());
    }
    let stack: EffectStack = serde_wasm_bindgen::from_value(value)
        .map_err(|e| js_error(format!("Invalid effect stack: {e}")))?;
    Ok(stack.sanitized())
}

/// CSS `filter` string for a stack, or `"none"`.
#[wasm_bindgen]
pub fn css_filter(stack: JsValue) -> Result<String, JsValue> {
    Ok(pixmill_core::adjust::css_filter(&stack_from_js(stack)?))
}

/// Render a stack into pixels.
#[wasm_bindgen]
pub fn bake_effects(image: &JsDecodedImage, stack: JsValue) -> Result<JsDecodedImage, JsValue> {
    let stack = stack_from_js(stack)?;
    Ok(JsDecodedImage::from_decoded(bake(&image.to_decoded(), &stack)))
}

/// Display labels of every preset, in menu order.
#[wasm_bindgen]
pub fn preset_labels() -> Vec<String> {
    FilterPreset::ALL
        .iter()
        .map(|p| p.label().to_string())
        .collect()
}

/// CSS filter string a preset stands for.
#[wasm_bindgen]
pub fn preset_filter(label: &str) -> Result<String, JsValue> {
    let preset =
        FilterPreset::from_label(label).ok_or_else(|| js_error(format!("Unknown preset: {label}")))?;
    Ok(pixmill_core::adjust::css_filter(&preset.stack()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_kind_from_name() {
        assert_eq!(effect_kind_from_name("Brightness"), Some(EffectKind::Brightness));
        assert_eq!(effect_kind_from_name("hue-rotate"), Some(EffectKind::Hue));
        assert_eq!(effect_kind_from_name("sharpen"), None);
    }

    #[test]
    fn test_preset_labels() {
        let labels = preset_labels();
        assert_eq!(labels.len(), 9);
        assert_eq!(labels[0], "Original");
        assert!(labels.contains(&"B&W".to_string()));
    }

    #[test]
    fn test_preset_filter() {
        assert_eq!(preset_filter("Original").unwrap(), "none");
        assert_eq!(preset_filter("B&W").unwrap(), "contrast(110%) saturate(0%)");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_css_filter_from_object() {
        let stack = EffectStack::default().with(EffectKind::Blur, 3.0);
        let js = serde_wasm_bindgen::to_value(&stack).unwrap();
        assert_eq!(css_filter(js).unwrap(), "blur(3px)");
    }

    #[wasm_bindgen_test]
    fn test_css_filter_undefined_is_none() {
        assert_eq!(css_filter(JsValue::UNDEFINED).unwrap(), "none");
    }

    #[wasm_bindgen_test]
    fn test_invalid_stack_errors() {
        assert!(css_filter(JsValue::from_str("loud")).is_err());
    }
}
