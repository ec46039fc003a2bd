//! Editor-wide configuration.
//!
//! The host passes this once at startup (as a plain JS object); every field
//! has a default so partial objects are accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compress::{CompressionSettings, SearchOptions, SettingsError};
use crate::decode::FilterType;
use crate::encode::OutputFormat;

/// Errors for an invalid [`EditorConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("{field} must be positive")]
    ZeroEdge { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Settings used when an export or batch passes none.
    pub default_compression: CompressionSettings,
    /// Quality search tuning.
    pub search: SearchOptions,
    /// Format of rendered preview bytes.
    pub preview_format: OutputFormat,
    /// Longest edge of rendered previews; `None` renders at full size.
    pub preview_max_edge: Option<u32>,
    /// Longest edge of collection thumbnails.
    pub thumbnail_edge: u32,
    /// Spacing between deliveries of a multi-file export.
    pub batch_delivery_delay_ms: u32,
    /// Resampling filter for resize and preview downscaling.
    pub resample_filter: FilterType,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_compression: CompressionSettings::default(),
            search: SearchOptions::default(),
            preview_format: OutputFormat::Png,
            preview_max_edge: Some(2048),
            thumbnail_edge: 256,
            batch_delivery_delay_ms: 500,
            resample_filter: FilterType::Lanczos3,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_compression.validate()?;
        self.search.validate()?;
        if self.preview_max_edge == Some(0) {
            return Err(ConfigError::ZeroEdge {
                field: "previewMaxEdge",
            });
        }
        if self.thumbnail_edge == 0 {
            return Err(ConfigError::ZeroEdge {
                field: "thumbnailEdge",
            });
        }
        Ok(())
    }
}
