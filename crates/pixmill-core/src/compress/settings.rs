//! User-facing compression settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::OutputFormat;

/// Errors for out-of-range compression or search settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Quality must be between 1 and 100, got {0}")]
    QualityOutOfRange(u8),

    #[error("Target size must be a positive number of kilobytes")]
    ZeroTargetSize,

    #[error("Invalid quality bracket [{min}, {max}]: need 0 < min < max <= 1")]
    InvalidQualityBracket { min: f32, max: f32 },

    #[error("Search needs at least one iteration")]
    ZeroIterations,

    #[error("Search tolerance must be positive, got {0}")]
    InvalidTolerance(f32),
}

/// Output format, quality and optional byte budget for an encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionSettings {
    /// Encoder quality (1-100). Ignored for PNG.
    pub quality: u8,
    pub format: OutputFormat,
    /// Byte budget in KiB. When set, quality is searched instead of fixed.
    #[serde(rename = "targetSizeKB")]
    pub target_size_kb: Option<u32>,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            quality: 80,
            format: OutputFormat::Jpeg,
            target_size_kb: None,
        }
    }
}

impl CompressionSettings {
    pub fn new(format: OutputFormat, quality: u8) -> Self {
        Self {
            quality,
            format,
            target_size_kb: None,
        }
    }

    pub fn with_target_size_kb(mut self, kb: u32) -> Self {
        self.target_size_kb = Some(kb);
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=100).contains(&self.quality) {
            return Err(SettingsError::QualityOutOfRange(self.quality));
        }
        if self.target_size_kb == Some(0) {
            return Err(SettingsError::ZeroTargetSize);
        }
        Ok(())
    }

    /// Byte budget (`target_size_kb * 1024`), if one is set.
    pub fn target_bytes(&self) -> Option<usize> {
        self.target_size_kb.map(|kb| kb as usize * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = CompressionSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.target_bytes(), None);
    }

    #[test]
    fn test_target_bytes_uses_kib() {
        let settings = CompressionSettings::new(OutputFormat::Jpeg, 80).with_target_size_kb(500);
        assert_eq!(settings.target_bytes(), Some(512_000));
    }

    #[test]
    fn test_validation_errors() {
        let zero_quality = CompressionSettings::new(OutputFormat::Webp, 0);
        assert_eq!(zero_quality.validate(), Err(SettingsError::QualityOutOfRange(0)));

        let too_high = CompressionSettings::new(OutputFormat::Webp, 101);
        assert!(too_high.validate().is_err());

        let zero_target = CompressionSettings::default().with_target_size_kb(0);
        assert_eq!(zero_target.validate(), Err(SettingsError::ZeroTargetSize));
    }

    #[test]
    fn test_deserialize_from_host_shape() {
        let settings: CompressionSettings =
            serde_json::from_str(r#"{"quality": 65, "format": "webp", "targetSizeKB": 200}"#)
                .unwrap();
        assert_eq!(settings.quality, 65);
        assert_eq!(settings.format, OutputFormat::Webp);
        assert_eq!(settings.target_size_kb, Some(200));

        let partial: CompressionSettings = serde_json::from_str(r#"{"format": "png"}"#).unwrap();
        assert_eq!(partial.quality, 80);
        assert_eq!(partial.target_size_kb, None);
    }
}
