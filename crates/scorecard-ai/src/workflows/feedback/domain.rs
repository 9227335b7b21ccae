use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workflows::scorecard::Quarter;

/// The seven organizational core values peers rate each quarter. Serde names
/// match the upstream record keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum CoreValue {
    ChristCentered,
    HolisticInvestment,
    TrustedRelationships,
    HumbleExcellence,
    LocallyLed,
    UnwaveringIntegrity,
    SustainableEmpowerment,
}

impl CoreValue {
    pub const fn ordered() -> [CoreValue; 7] {
        [
            CoreValue::ChristCentered,
            CoreValue::HolisticInvestment,
            CoreValue::TrustedRelationships,
            CoreValue::HumbleExcellence,
            CoreValue::LocallyLed,
            CoreValue::UnwaveringIntegrity,
            CoreValue::SustainableEmpowerment,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            CoreValue::ChristCentered => "Christ-Centered",
            CoreValue::HolisticInvestment => "Holistic Investment in Women",
            CoreValue::TrustedRelationships => "Cultivating Trusted Relationships",
            CoreValue::HumbleExcellence => "Humble Excellence",
            CoreValue::LocallyLed => "Locally Led",
            CoreValue::UnwaveringIntegrity => "Unwavering Integrity",
            CoreValue::SustainableEmpowerment => "Sustainable Empowerment",
        }
    }
}

/// One reviewer's submission for one employee and quarter. Reviewer identity
/// stays on the server side of the aggregation boundary; employee-facing code
/// only ever sees [`super::FeedbackAggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerFeedbackRecord {
    pub reviewer_email: String,
    pub employee_email: String,
    pub year: i32,
    pub quarter: Quarter,
    pub ratings: BTreeMap<CoreValue, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl PeerFeedbackRecord {
    /// Mean across the seven core-value ratings, equal weight per value.
    pub fn mean_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        self.ratings.values().sum::<f64>() / self.ratings.len() as f64
    }
}

/// A manager's request for anonymous feedback on an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub id: String,
    pub manager_email: String,
    pub employee_email: String,
    pub employee_name: String,
    pub year: i32,
    pub quarter: Quarter,
    pub reviewers: Vec<String>,
}

/// A reviewer's free-text answers before classification into ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub request_id: String,
    pub reviewer_email: String,
    pub entries: BTreeMap<CoreValue, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}
