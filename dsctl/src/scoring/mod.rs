//! Deterministic text scoring.
//!
//! Every submitted sample is scored by two pure functions:
//!
//! - [`quality`]: a 0-100 heuristic built from four 25-point sub-scores (length, character
//!   diversity, punctuation structure, word complexity)
//! - [`dialect`]: a substring-indicator classifier over three fixed particle lists
//!
//! Neither function touches shared state, so the same text always yields the same
//! [`Scorecard`]. Callers are expected to reject empty or whitespace-only input before scoring;
//! both functions still degrade to zeroed results on an empty string.

mod dialect;
mod quality;

pub use dialect::{Dialect, DialectDetection, CENTRAL_INDICATORS, NORTHERN_INDICATORS, SOUTHERN_INDICATORS, dialect};
pub use quality::{ALPHABET, QualityMetrics, quality};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

/// Quality metrics and dialect guess for a single text.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Scorecard {
    pub quality: QualityMetrics,
    pub dialect: DialectDetection,
}

/// Score a text: quality metrics plus dialect classification.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn score(text: &str) -> Scorecard {
    Scorecard {
        quality: quality(text),
        dialect: dialect(text),
    }
}

/// Round to one decimal place, half-to-even on the exact binary value.
///
/// `6.25` is exactly representable and rounds down to `6.2`; `0.15` is stored as
/// `0.1499999...` and rounds to `0.1`. A plain `(x * 10.0).round() / 10.0` gets both wrong.
pub(crate) fn round1(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .or_else(|| Decimal::from_f64(value))
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round1_uses_half_even_on_exact_ties() {
        assert_eq!(round1(6.25), 6.2);
        assert_eq!(round1(6.35), 6.3); // 6.3499999...
        assert_eq!(round1(0.75), 0.8);
        assert_eq!(round1(62.25), 62.2);
    }

    #[test]
    fn round1_respects_binary_representation() {
        assert_eq!(round1(0.15), 0.1);
        assert_eq!(round1(2.5000000000000004), 2.5);
        assert_eq!(round1(5.555555555555555), 5.6);
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(100.0), 100.0);
    }

    #[test]
    fn score_is_deterministic() {
        let text = "Waa wanaagsan tahay. Soo dhawoow!";
        assert_eq!(score(text), score(text));
    }
}
