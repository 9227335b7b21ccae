//! Weighted-score aggregation and submit-time weight validation.

use serde::{Deserialize, Serialize};

use super::domain::ScoreLineItem;
use super::rating::round2;

/// Weights must total 100% within this tolerance or the submission is
/// rejected outright (no partial save).
pub const WEIGHT_TOLERANCE: f64 = 0.01;
pub const REQUIRED_TOTAL_WEIGHT: f64 = 100.0;

/// Contribution of one line to the total score, rounded to two decimals.
pub fn weighted_score(rating: f64, weight: f64) -> f64 {
    round2(rating * weight / 100.0)
}

/// Totals across a submission's line items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTotals {
    pub total_weighted_score: f64,
    pub total_weight: f64,
}

pub fn aggregate(items: &[ScoreLineItem]) -> ScoreTotals {
    let mut total_weighted_score = 0.0;
    let mut total_weight = 0.0;
    for item in items {
        total_weighted_score += item.weighted;
        total_weight += item.weight_or_zero();
    }

    ScoreTotals {
        total_weighted_score: round2(total_weighted_score),
        total_weight,
    }
}

/// Submit-time weight validation failures. These are user-facing validation
/// outcomes, not system faults.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightValidationError {
    #[error("every line item needs a weight before the scorecard can be submitted")]
    IncompleteWeights,
    #[error("weights must add up to 100% (current total: {total:.2}%)")]
    WeightSumMismatch { total: f64 },
}

/// A blank weight (or a NaN, which would otherwise slip through a sum check)
/// rejects the whole submission; so does any total off 100% by more than the
/// tolerance.
pub fn validate_weights(items: &[ScoreLineItem]) -> Result<(), WeightValidationError> {
    let mut total = 0.0;
    for item in items {
        match item.weight {
            Some(weight) if weight.is_finite() => total += weight,
            _ => return Err(WeightValidationError::IncompleteWeights),
        }
    }

    if (total - REQUIRED_TOTAL_WEIGHT).abs() > WEIGHT_TOLERANCE {
        return Err(WeightValidationError::WeightSumMismatch { total });
    }

    Ok(())
}
