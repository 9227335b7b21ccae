use serde::{Deserialize, Serialize};

use super::domain::PeerFeedbackRecord;
use crate::workflows::scorecard::rating::round2;

/// The only shape that crosses the anonymity boundary: how many peers have
/// rated, and the mean of their per-record means. `average_score` stays
/// `None` until at least one record exists, so "no peers have rated yet"
/// never reads as "peers rated this 0.0".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAggregate {
    pub count: usize,
    pub average_score: Option<f64>,
}

impl FeedbackAggregate {
    pub const fn empty() -> Self {
        Self {
            count: 0,
            average_score: None,
        }
    }

    /// Qualitative band used on manager-facing breakdowns.
    pub fn band_label(&self) -> Option<&'static str> {
        let score = self.average_score?;
        Some(if score >= 4.5 {
            "Exceptional"
        } else if score >= 4.0 {
            "Excellent"
        } else if score >= 3.5 {
            "Very Good"
        } else if score >= 3.0 {
            "Good"
        } else {
            "Needs Improvement"
        })
    }
}

/// Equal weight across reviewers and across the seven values: average each
/// record's mean, then average the means.
pub fn aggregate(records: &[PeerFeedbackRecord]) -> FeedbackAggregate {
    if records.is_empty() {
        return FeedbackAggregate::empty();
    }

    let total: f64 = records.iter().map(PeerFeedbackRecord::mean_rating).sum();
    FeedbackAggregate {
        count: records.len(),
        average_score: Some(round2(total / records.len() as f64)),
    }
}
