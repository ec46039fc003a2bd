//! Crate-level error type.

use thiserror::Error;

use crate::collection::ImageId;
use crate::compress::{CompressError, SettingsError};
use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::text::TextError;
use crate::transform::TransformError;

/// Any failure surfaced by the collection, export or batch operations.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Compress(#[from] CompressError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unsupported file type {0:?}: only image/* files can be opened")]
    UnsupportedMimeType(String),

    #[error("No image with id {0}")]
    ImageNotFound(ImageId),

    #[error("The collection is empty")]
    EmptyCollection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EditError::UnsupportedMimeType("application/pdf".into());
        assert_eq!(
            err.to_string(),
            "Unsupported file type \"application/pdf\": only image/* files can be opened"
        );

        let err: EditError = TextError::EmptyText.into();
        assert_eq!(err.to_string(), "Overlay text is empty");

        let err: EditError = DecodeError::EmptyInput.into();
        assert!(err.to_string().starts_with("Decode failed"));
    }
}
