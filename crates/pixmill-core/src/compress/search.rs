//! Binary search over encoder quality to fit a byte budget.
//!
//! The search is a pure function of an injected encoder closure, so it can be
//! exercised with a synthetic size curve instead of a real codec.

use log::debug;
use serde::{Deserialize, Serialize};

use super::SettingsError;

/// Tuning for the quality search.
///
/// Quality is normalized to `(0, 1]`. Zero is a degenerate encoder setting and
/// is never tried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Lowest quality the search may settle on (also the best-effort fallback).
    pub min_quality: f32,
    /// Highest quality the search may try.
    pub max_quality: f32,
    /// Hard cap on trial encodes.
    pub max_iterations: u32,
    /// Stop once the bracket is this narrow.
    pub tolerance: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_quality: 0.1,
            max_quality: 1.0,
            max_iterations: 10,
            tolerance: 0.02,
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let in_range = |q: f32| q > 0.0 && q <= 1.0;
        if !in_range(self.min_quality)
            || !in_range(self.max_quality)
            || self.min_quality >= self.max_quality
        {
            return Err(SettingsError::InvalidQualityBracket {
                min: self.min_quality,
                max: self.max_quality,
            });
        }
        if self.max_iterations == 0 {
            return Err(SettingsError::ZeroIterations);
        }
        if !(self.tolerance > 0.0) {
            return Err(SettingsError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Result of a quality search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Encoded bytes of the chosen quality.
    pub bytes: Vec<u8>,
    /// Normalized quality that produced `bytes`.
    pub quality: f32,
    /// Trial encodes performed inside the search loop.
    pub iterations: u32,
    /// Total encodes including the floor and ceiling fallbacks, if any.
    pub encodes: u32,
    /// `false` when nothing fit and `bytes` is the floor-quality fallback.
    pub budget_met: bool,
}

/// Find the highest quality whose encoding fits in `target_bytes`.
///
/// Each iteration encodes the midpoint of `[floor, ceiling]`. A fitting
/// midpoint becomes the current best and raises the floor; an oversized one
/// lowers the ceiling. The loop stops after `max_iterations` trials or once
/// `ceiling - floor <= tolerance`.
///
/// If no trial fits, the floor (`min_quality`) is tried, then the ceiling
/// (`max_quality`), which midpoints never reach. When neither fits the floor
/// encoding is returned with `budget_met = false`. That is a best-effort
/// answer, not an error.
pub fn search_quality<F, E>(
    mut encode: F,
    target_bytes: usize,
    options: &SearchOptions,
) -> Result<SearchOutcome, E>
where
    F: FnMut(f32) -> Result<Vec<u8>, E>,
{
    let mut floor = options.min_quality;
    let mut ceiling = options.max_quality;
    let mut best: Option<(f32, Vec<u8>)> = None;
    let mut iterations = 0;

    while iterations < options.max_iterations && ceiling - floor > options.tolerance {
        let mid = (floor + ceiling) / 2.0;
        let bytes = encode(mid)?;
        iterations += 1;

        let fits = bytes.len() <= target_bytes;
        debug!(
            "quality search #{iterations}: q={mid:.4} size={} target={target_bytes} fits={fits}",
            bytes.len()
        );

        if fits {
            best = Some((mid, bytes));
            floor = mid;
        } else {
            ceiling = mid;
        }
    }

    match best {
        Some((quality, bytes)) => Ok(SearchOutcome {
            bytes,
            quality,
            iterations,
            encodes: iterations,
            budget_met: true,
        }),
        None => {
            let floor_quality = options.min_quality;
            let floor_bytes = encode(floor_quality)?;
            debug!(
                "quality search: no trial fit {target_bytes} bytes, floor q={floor_quality} gave {} bytes",
                floor_bytes.len()
            );
            if floor_bytes.len() <= target_bytes {
                return Ok(SearchOutcome {
                    bytes: floor_bytes,
                    quality: floor_quality,
                    iterations,
                    encodes: iterations + 1,
                    budget_met: true,
                });
            }

            // Midpoints never reach the ceiling. A codec whose size is not
            // monotonic in quality can still fit there.
            let ceiling_quality = options.max_quality;
            let ceiling_bytes = encode(ceiling_quality)?;
            if ceiling_bytes.len() <= target_bytes {
                debug!(
                    "quality search: ceiling q={ceiling_quality} fits with {} bytes",
                    ceiling_bytes.len()
                );
                return Ok(SearchOutcome {
                    bytes: ceiling_bytes,
                    quality: ceiling_quality,
                    iterations,
                    encodes: iterations + 2,
                    budget_met: true,
                });
            }

            Ok(SearchOutcome {
                bytes: floor_bytes,
                quality: floor_quality,
                iterations,
                encodes: iterations + 2,
                budget_met: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// Fake encoder: size grows linearly with quality.
    fn linear(scale: f32) -> impl FnMut(f32) -> Result<Vec<u8>, Infallible> {
        move |q| Ok(vec![0u8; (q * scale).round() as usize])
    }

    #[test]
    fn test_finds_highest_fitting_quality() {
        let outcome = search_quality(linear(1000.0), 500, &SearchOptions::default()).unwrap();

        assert!(outcome.budget_met);
        assert!(outcome.bytes.len() <= 500);
        assert!(outcome.quality <= 0.5);
        assert!(outcome.quality > 0.5 - 0.03, "quality {}", outcome.quality);
    }

    #[test]
    fn test_large_budget_converges_to_max() {
        let outcome = search_quality(linear(1000.0), 10_000, &SearchOptions::default()).unwrap();
        assert!(outcome.budget_met);
        assert!(outcome.quality > 0.97);
    }

    #[test]
    fn test_unreachable_budget_falls_back_to_floor() {
        let outcome = search_quality(linear(1000.0), 50, &SearchOptions::default()).unwrap();

        assert!(!outcome.budget_met);
        assert_eq!(outcome.quality, 0.1);
        assert_eq!(outcome.bytes.len(), 100);
        // Floor plus the ceiling check.
        assert_eq!(outcome.encodes, outcome.iterations + 2);
    }

    #[test]
    fn test_non_monotonic_codec_still_finds_fitting_ceiling() {
        // Low qualities are large, only the very top is small.
        let encode = |q: f32| {
            let size = if q >= 1.0 { 150 } else { 2_000 + (q * 1_000.0) as usize };
            Ok::<_, Infallible>(vec![0u8; size])
        };
        let outcome = search_quality(encode, 1024, &SearchOptions::default()).unwrap();

        assert!(outcome.budget_met);
        assert_eq!(outcome.quality, 1.0);
        assert_eq!(outcome.bytes.len(), 150);
    }

    #[test]
    fn test_floor_exactly_fits_is_reported_as_met() {
        // Every trial is above 100 bytes but the floor itself is exactly 100.
        let outcome = search_quality(linear(1000.0), 100, &SearchOptions::default()).unwrap();
        assert!(outcome.budget_met);
        assert_eq!(outcome.bytes.len(), 100);
        assert_eq!(outcome.encodes, outcome.iterations + 1);
    }

    #[test]
    fn test_tolerance_stops_early() {
        let mut calls = 0;
        let options = SearchOptions::default();
        search_quality(
            |q| {
                calls += 1;
                Ok::<_, Infallible>(vec![0u8; (q * 1000.0) as usize])
            },
            400,
            &options,
        )
        .unwrap();
        // 0.9 wide bracket halves below 0.02 after 6 trials.
        assert_eq!(calls, 6);
    }

    #[test]
    fn test_iteration_cap() {
        let options = SearchOptions {
            tolerance: 1e-9,
            ..SearchOptions::default()
        };
        let outcome = search_quality(linear(1_000_000.0), 123_456, &options).unwrap();
        assert_eq!(outcome.iterations, 10);
    }

    #[test]
    fn test_encoder_error_propagates() {
        let result = search_quality(|_| Err::<Vec<u8>, _>("boom"), 10, &SearchOptions::default());
        assert_eq!(result.unwrap_err(), "boom");
    }

    #[test]
    fn test_options_validation() {
        assert!(SearchOptions::default().validate().is_ok());

        let bad_bracket = SearchOptions {
            min_quality: 0.0,
            ..SearchOptions::default()
        };
        assert!(matches!(
            bad_bracket.validate(),
            Err(SettingsError::InvalidQualityBracket { .. })
        ));

        let zero_iters = SearchOptions {
            max_iterations: 0,
            ..SearchOptions::default()
        };
        assert!(matches!(zero_iters.validate(), Err(SettingsError::ZeroIterations)));

        let nan_tolerance = SearchOptions {
            tolerance: f32::NAN,
            ..SearchOptions::default()
        };
        assert!(nan_tolerance.validate().is_err());
    }
}
