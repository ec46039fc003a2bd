//! Compression to a fixed quality or a target file size.
//!
//! Three strategies, picked from the [`CompressionSettings`]:
//!
//! - **Fixed quality**: no target size; a single encode at `quality`.
//! - **Target size**: a bounded binary search over quality (see
//!   [`search_quality`]) returning the highest quality that fits.
//! - **Lossless**: PNG has no quality knob, so the search is skipped and a
//!   single deterministic encode is returned whatever the target. The outcome
//!   still reports whether that encode happens to fit the budget.
//!
//! An unreachable budget is not an error: the floor-quality encode comes back
//! with `budget_met = false` so the caller can tell the user.

mod search;
mod settings;

pub use search::{search_quality, SearchOptions, SearchOutcome};
pub use settings::{CompressionSettings, SettingsError};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::codec::Codec;
use crate::decode::DecodedImage;
use crate::encode::{EncodeError, EncodedImage};

/// Errors from [`compress_image`].
#[derive(Debug, Error)]
pub enum CompressError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Which path produced a [`CompressionOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompressionStrategy {
    FixedQuality,
    TargetSize,
    Lossless,
}

/// An encoded artifact plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOutcome {
    pub encoded: EncodedImage,
    pub strategy: CompressionStrategy,
    /// Byte budget that was requested, if any.
    pub target_bytes: Option<usize>,
    /// `false` only when a budget was requested and could not be met.
    pub budget_met: bool,
    /// Trial encodes performed by the search (0 for single-encode paths).
    pub iterations: u32,
    /// Every encode performed, including the floor fallback.
    pub encodes: u32,
    /// Quality on the search's `(0, 1]` axis; `None` for lossless output.
    pub normalized_quality: Option<f32>,
}

impl CompressionOutcome {
    pub fn byte_length(&self) -> usize {
        self.encoded.byte_length()
    }

    /// Codec quality (1-100) that reproduces these exact bytes.
    pub fn quality(&self) -> Option<u8> {
        self.encoded.quality
    }
}

/// Map a normalized quality in `(0, 1]` to the codec's 1-100 scale.
pub fn quality_percent(normalized: f32) -> u8 {
    (normalized * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Compress `image` according to `settings`.
pub fn compress_image<C: Codec>(
    codec: &C,
    image: &DecodedImage,
    settings: &CompressionSettings,
    options: &SearchOptions,
) -> Result<CompressionOutcome, CompressError> {
    settings.validate()?;
    let target_bytes = settings.target_bytes();
    let format = settings.format;

    if format.is_lossless() {
        let encoded = codec.encode(image, format, settings.quality)?;
        let budget_met = target_bytes.map_or(true, |t| encoded.byte_length() <= t);
        if let Some(target) = target_bytes {
            info!(
                "{format} is lossless: target of {target} bytes ignored, single encode gave {} bytes",
                encoded.byte_length()
            );
        }
        return Ok(CompressionOutcome {
            encoded,
            strategy: CompressionStrategy::Lossless,
            target_bytes,
            budget_met,
            iterations: 0,
            encodes: 1,
            normalized_quality: None,
        });
    }

    let Some(target) = target_bytes else {
        let encoded = codec.encode(image, format, settings.quality)?;
        debug!(
            "fixed quality {} {format}: {} bytes",
            settings.quality,
            encoded.byte_length()
        );
        return Ok(CompressionOutcome {
            encoded,
            strategy: CompressionStrategy::FixedQuality,
            target_bytes: None,
            budget_met: true,
            iterations: 0,
            encodes: 1,
            normalized_quality: Some(f32::from(settings.quality) / 100.0),
        });
    };

    options.validate()?;
    let outcome = search_quality(
        |q| codec.encode(image, format, quality_percent(q)).map(|e| e.bytes),
        target,
        options,
    )?;

    let quality = quality_percent(outcome.quality);
    info!(
        "target {target} bytes as {format}: q={quality} size={} iterations={} met={}",
        outcome.bytes.len(),
        outcome.iterations,
        outcome.budget_met
    );

    Ok(CompressionOutcome {
        encoded: EncodedImage {
            bytes: outcome.bytes,
            format,
            quality: Some(quality),
        },
        strategy: CompressionStrategy::TargetSize,
        target_bytes: Some(target),
        budget_met: outcome.budget_met,
        iterations: outcome.iterations,
        encodes: outcome.encodes,
        normalized_quality: Some(outcome.quality),
    })
}
