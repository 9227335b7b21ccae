use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Measure name for the fixed peer-review line item inside the Customer dimension.
pub const PEER_REVIEW_MEASURE: &str = "Internal Customer (Peer Review)";

/// Balanced-scorecard dimension. Serde names match the upstream display labels
/// so records exported from the legacy sheet deserialize without mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Financial,
    Customer,
    #[serde(rename = "Internal Process")]
    InternalProcess,
    #[serde(rename = "Learning & Growth")]
    LearningGrowth,
}

impl Dimension {
    pub const fn ordered() -> [Dimension; 4] {
        [
            Dimension::Financial,
            Dimension::Customer,
            Dimension::InternalProcess,
            Dimension::LearningGrowth,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Dimension::Financial => "Financial",
            Dimension::Customer => "Customer",
            Dimension::InternalProcess => "Internal Process",
            Dimension::LearningGrowth => "Learning & Growth",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Dimension::ordered()
            .into_iter()
            .find(|dimension| dimension.label().eq_ignore_ascii_case(trimmed))
    }

    /// Financial measures use the inverted (lower-is-better) rating formula.
    pub const fn is_financial(self) -> bool {
        matches!(self, Dimension::Financial)
    }

    /// Internal Process and Learning & Growth actuals accumulate across weekly
    /// entries within the quarter rather than being re-measured each period.
    pub const fn is_cumulative(self) -> bool {
        matches!(self, Dimension::InternalProcess | Dimension::LearningGrowth)
    }
}

/// How often an employee reports progress for a measure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Frequency {
    #[default]
    #[serde(rename = "weekly", alias = "Weekly")]
    Weekly,
    #[serde(rename = "monthly", alias = "Monthly")]
    Monthly,
    #[serde(rename = "quarterly", alias = "Quarterly")]
    Quarterly,
}

impl Frequency {
    pub const fn label(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }
}

/// Calendar quarter, derived from the reporting month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const fn ordered() -> [Quarter; 4] {
        [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4]
    }

    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }

    pub const fn months(self) -> [u32; 3] {
        match self {
            Quarter::Q1 => [1, 2, 3],
            Quarter::Q2 => [4, 5, 6],
            Quarter::Q3 => [7, 8, 9],
            Quarter::Q4 => [10, 11, 12],
        }
    }

    pub fn contains_month(self, month: u32) -> bool {
        let months = self.months();
        months[0] == month || months[1] == month || months[2] == month
    }
}

pub fn month_name(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// One measured line inside a scorecard submission. `rating` and `weighted`
/// are derived server-side; a `weight` of `None` means the field was left
/// blank (which blocks submission, distinct from an explicit zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLineItem {
    pub dimension: Dimension,
    pub measure: String,
    #[serde(default)]
    pub is_financial: bool,
    #[serde(default)]
    pub is_cumulative: bool,
    #[serde(default)]
    pub target: f64,
    #[serde(default)]
    pub actual: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub weighted: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_link: Option<String>,
}

impl ScoreLineItem {
    pub fn weight_or_zero(&self) -> f64 {
        self.weight.filter(|value| value.is_finite()).unwrap_or(0.0)
    }

    pub fn is_peer_review(&self) -> bool {
        self.dimension == Dimension::Customer && self.measure == PEER_REVIEW_MEASURE
    }
}

/// Uniqueness key for a submission: one report per employee and period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionKey {
    pub employee_email: String,
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

/// One employee's scorecard report for one reporting period. Immutable once
/// persisted; later reports supersede rather than mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardSubmission {
    pub employee_email: String,
    pub employee_name: String,
    pub job_title: String,
    pub division: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub year: i32,
    pub month: u32,
    pub week: u32,
    #[serde(default)]
    pub progress_frequency: Frequency,
    pub scores: Vec<ScoreLineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ScorecardSubmission {
    pub fn quarter(&self) -> Quarter {
        Quarter::from_month(self.month)
    }

    pub fn key(&self) -> SubmissionKey {
        SubmissionKey {
            employee_email: self.employee_email.clone(),
            year: self.year,
            month: self.month,
            week: self.week,
        }
    }

    /// Sum of the per-line weighted scores, the headline number on reports.
    pub fn total_weighted_score(&self) -> f64 {
        self.scores.iter().map(|item| item.weighted).sum()
    }
}

/// Inbound scorecard payload before server-side rating recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub employee_email: String,
    pub employee_name: String,
    pub job_title: String,
    pub division: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub year: i32,
    pub month: u32,
    pub week: u32,
    #[serde(default)]
    pub progress_frequency: Frequency,
    pub scores: Vec<ScoreLineDraft>,
}

/// One line of an inbound draft; targets/actuals only, derived fields absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLineDraft {
    pub dimension: Dimension,
    pub measure: String,
    #[serde(default)]
    pub target: f64,
    #[serde(default)]
    pub actual: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_derivation_follows_ceiling_of_month_over_three() {
        assert_eq!(Quarter::from_month(1), Quarter::Q1);
        assert_eq!(Quarter::from_month(3), Quarter::Q1);
        assert_eq!(Quarter::from_month(4), Quarter::Q2);
        assert_eq!(Quarter::from_month(9), Quarter::Q3);
        assert_eq!(Quarter::from_month(12), Quarter::Q4);
    }

    #[test]
    fn dimension_labels_round_trip_through_from_label() {
        for dimension in Dimension::ordered() {
            assert_eq!(Dimension::from_label(dimension.label()), Some(dimension));
        }
        assert_eq!(
            Dimension::from_label("  learning & growth "),
            Some(Dimension::LearningGrowth)
        );
        assert_eq!(Dimension::from_label("Marketing"), None);
    }

    #[test]
    fn cumulative_convention_covers_process_and_growth_only() {
        assert!(Dimension::InternalProcess.is_cumulative());
        assert!(Dimension::LearningGrowth.is_cumulative());
        assert!(!Dimension::Financial.is_cumulative());
        assert!(!Dimension::Customer.is_cumulative());
    }

    #[test]
    fn blank_and_non_finite_weights_read_as_zero() {
        let mut item = ScoreLineItem {
            dimension: Dimension::Customer,
            measure: "External Customer Satisfaction".to_string(),
            is_financial: false,
            is_cumulative: false,
            target: 10.0,
            actual: 9.0,
            weight: None,
            rating: 0.0,
            weighted: 0.0,
            comment: None,
            evidence_link: None,
        };
        assert_eq!(item.weight_or_zero(), 0.0);
        item.weight = Some(f64::NAN);
        assert_eq!(item.weight_or_zero(), 0.0);
        item.weight = Some(5.0);
        assert_eq!(item.weight_or_zero(), 5.0);
    }
}
