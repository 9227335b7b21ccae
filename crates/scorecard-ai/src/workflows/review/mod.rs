//! Period review synthesis: bucket the period's ratings, suggest goals, and
//! select a deterministic narrative by score band.
//!
//! The review score is the plain unweighted mean of ratings. It narrates the
//! raw rating distribution and is a different number from the weighted total
//! the aggregator computes; the two must never be conflated.

mod comments;
mod goals;

pub use comments::comment_suggestions;
pub use goals::goal_suggestions;

use serde::{Deserialize, Serialize};

use crate::workflows::scorecard::rating::round2;
use crate::workflows::scorecard::{Dimension, Quarter, ScoreLineItem, ScorecardSubmission};

const STRENGTH_THRESHOLD: f64 = 4.0;
const IMPROVEMENT_THRESHOLD: f64 = 3.0;
const GOAL_THRESHOLD: f64 = 3.5;
const MAX_GOAL_DIMENSIONS: usize = 3;

const NO_DATA_SUMMARY: &str = "Insufficient data for AI-generated review.";
const NO_STRENGTHS: &str = "No significant strengths identified this period";
const NO_IMPROVEMENTS: &str = "Continue maintaining current performance levels";
const NO_GOALS: &str = "Set specific, measurable goals for next review period";

/// The window a review narrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPeriod {
    Monthly { month: u32 },
    Quarterly { quarter: Quarter },
    Yearly,
}

impl ReviewPeriod {
    const fn phrase(self) -> &'static str {
        match self {
            ReviewPeriod::Monthly { .. } => "this month",
            ReviewPeriod::Quarterly { .. } => "this quarter",
            ReviewPeriod::Yearly => "this year",
        }
    }
}

/// Narrative review plus bucketed findings for one employee and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReview {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub goals: Vec<String>,
    /// Unweighted mean of the period's ratings, two decimals.
    pub average_rating: f64,
}

impl PeriodReview {
    fn insufficient_data() -> Self {
        Self {
            summary: NO_DATA_SUMMARY.to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            goals: Vec::new(),
            average_rating: 0.0,
        }
    }
}

/// Filter a submission history down to the review window and flatten the
/// surviving line items in submission order.
pub fn collect_period_scores(
    history: &[ScorecardSubmission],
    period: ReviewPeriod,
    year: i32,
) -> Vec<ScoreLineItem> {
    history
        .iter()
        .filter(|submission| submission.year == year)
        .filter(|submission| match period {
            ReviewPeriod::Monthly { month } => submission.month == month,
            ReviewPeriod::Quarterly { quarter } => quarter.contains_month(submission.month),
            ReviewPeriod::Yearly => true,
        })
        .flat_map(|submission| submission.scores.iter().cloned())
        .collect()
}

/// Synthesize a review from a submission history.
pub fn synthesize(
    employee_name: &str,
    history: &[ScorecardSubmission],
    period: ReviewPeriod,
    year: i32,
) -> PeriodReview {
    let scores = collect_period_scores(history, period, year);
    synthesize_scores(employee_name, &scores, period)
}

/// Synthesize a review from an already-collected set of line items.
pub fn synthesize_scores(
    employee_name: &str,
    scores: &[ScoreLineItem],
    period: ReviewPeriod,
) -> PeriodReview {
    if scores.is_empty() {
        return PeriodReview::insufficient_data();
    }

    let average = scores.iter().map(|item| item.rating).sum::<f64>() / scores.len() as f64;

    let strengths: Vec<String> = scores
        .iter()
        .filter(|item| item.rating >= STRENGTH_THRESHOLD)
        .map(|item| {
            format!(
                "{}: Consistently strong performance with rating of {:.1}",
                item.measure, item.rating
            )
        })
        .collect();

    let improvements: Vec<String> = scores
        .iter()
        .filter(|item| item.rating < IMPROVEMENT_THRESHOLD)
        .map(|item| {
            format!(
                "{}: Requires attention, current rating {:.1}",
                item.measure, item.rating
            )
        })
        .collect();

    // Dimensions needing work, first appearance order, capped.
    let mut goal_dimensions: Vec<Dimension> = Vec::new();
    for item in scores {
        if item.rating < GOAL_THRESHOLD && !goal_dimensions.contains(&item.dimension) {
            goal_dimensions.push(item.dimension);
            if goal_dimensions.len() == MAX_GOAL_DIMENSIONS {
                break;
            }
        }
    }
    let goals: Vec<String> = goal_dimensions
        .into_iter()
        .filter_map(|dimension| goal_suggestions(dimension, average).into_iter().next())
        .collect();

    PeriodReview {
        summary: summary_for(employee_name, average, period),
        strengths: fallback(strengths, NO_STRENGTHS),
        improvements: fallback(improvements, NO_IMPROVEMENTS),
        goals: fallback(goals, NO_GOALS),
        average_rating: round2(average),
    }
}

fn fallback(bucket: Vec<String>, sentinel: &str) -> Vec<String> {
    if bucket.is_empty() {
        vec![sentinel.to_string()]
    } else {
        bucket
    }
}

fn summary_for(name: &str, average: f64, period: ReviewPeriod) -> String {
    let phrase = period.phrase();
    if average >= 4.5 {
        format!(
            "{name} has demonstrated exceptional performance {phrase} with an average score of \
             {average:.2}. Their consistent excellence across multiple dimensions makes them a \
             valuable asset to the team."
        )
    } else if average >= 3.5 {
        format!(
            "{name} shows strong performance {phrase} with an average score of {average:.2}. \
             They consistently meet expectations and demonstrate reliability in their \
             responsibilities."
        )
    } else if average >= 3.0 {
        format!(
            "{name} meets baseline expectations with an average score of {average:.2}. There \
             are opportunities for growth and development in several areas."
        )
    } else {
        format!(
            "{name}'s performance {phrase} ({average:.2}) indicates a need for focused \
             improvement. Let's schedule a detailed discussion to address challenges and \
             provide necessary support."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::scorecard::Frequency;

    fn item(dimension: Dimension, measure: &str, rating: f64) -> ScoreLineItem {
        ScoreLineItem {
            dimension,
            measure: measure.to_string(),
            is_financial: dimension.is_financial(),
            is_cumulative: dimension.is_cumulative(),
            target: 10.0,
            actual: 10.0,
            weight: Some(25.0),
            rating,
            weighted: 0.0,
            comment: None,
            evidence_link: None,
        }
    }

    fn submission(year: i32, month: u32, scores: Vec<ScoreLineItem>) -> ScorecardSubmission {
        ScorecardSubmission {
            employee_email: "amara@example.org".to_string(),
            employee_name: "Amara Okafor".to_string(),
            job_title: "Program Officer".to_string(),
            division: "Programs".to_string(),
            level: None,
            year,
            month,
            week: 1,
            progress_frequency: Frequency::Weekly,
            scores,
            submitted_at: None,
        }
    }

    #[test]
    fn empty_history_returns_the_insufficient_data_sentinel() {
        let review = synthesize(
            "Amara Okafor",
            &[],
            ReviewPeriod::Quarterly {
                quarter: Quarter::Q3,
            },
            2025,
        );
        assert_eq!(review.summary, NO_DATA_SUMMARY);
        assert!(review.strengths.is_empty());
        assert!(review.improvements.is_empty());
        assert!(review.goals.is_empty());
        assert_eq!(review.average_rating, 0.0);
    }

    #[test]
    fn exceptional_band_reports_strengths_and_the_improvements_sentinel() {
        let scores = vec![
            item(Dimension::InternalProcess, "Process Improvement", 4.8),
            item(Dimension::LearningGrowth, "Training Hours", 4.6),
        ];
        let review = synthesize_scores(
            "Amara Okafor",
            &scores,
            ReviewPeriod::Quarterly {
                quarter: Quarter::Q3,
            },
        );
        assert!(review.summary.starts_with(
            "Amara Okafor has demonstrated exceptional performance this quarter"
        ));
        assert_eq!(review.strengths.len(), 2);
        assert_eq!(
            review.improvements,
            vec![NO_IMPROVEMENTS.to_string()]
        );
        assert_eq!(review.goals, vec![NO_GOALS.to_string()]);
        assert_eq!(review.average_rating, 4.7);
    }

    #[test]
    fn low_ratings_land_in_improvements_and_seed_goals() {
        let scores = vec![
            item(Dimension::Financial, "Budget Management", 2.1),
            item(Dimension::InternalProcess, "Process Improvement", 2.8),
            item(Dimension::LearningGrowth, "Training Hours", 3.2),
            item(Dimension::Customer, "External Customer Satisfaction", 3.4),
        ];
        let review = synthesize_scores(
            "Amara Okafor",
            &scores,
            ReviewPeriod::Yearly,
        );
        assert_eq!(review.improvements.len(), 2);
        assert!(review.improvements[0]
            .contains("Budget Management: Requires attention, current rating 2.1"));
        // Four dimensions qualify under 3.5 but goals cap at three, in
        // first-appearance order.
        assert_eq!(review.goals.len(), 3);
        assert!(review.summary.contains("indicates a need for focused improvement"));
    }

    #[test]
    fn period_filter_scopes_the_history_window() {
        let history = vec![
            submission(
                2025,
                2,
                vec![item(Dimension::InternalProcess, "Process Improvement", 4.0)],
            ),
            submission(
                2025,
                8,
                vec![item(Dimension::InternalProcess, "Process Improvement", 2.0)],
            ),
            submission(
                2024,
                8,
                vec![item(Dimension::InternalProcess, "Process Improvement", 5.0)],
            ),
        ];

        let q3 = collect_period_scores(
            &history,
            ReviewPeriod::Quarterly {
                quarter: Quarter::Q3,
            },
            2025,
        );
        assert_eq!(q3.len(), 1);
        assert_eq!(q3[0].rating, 2.0);

        let yearly = collect_period_scores(&history, ReviewPeriod::Yearly, 2025);
        assert_eq!(yearly.len(), 2);

        let february = collect_period_scores(&history, ReviewPeriod::Monthly { month: 2 }, 2025);
        assert_eq!(february.len(), 1);
        assert_eq!(february[0].rating, 4.0);
    }

    #[test]
    fn monthly_phrase_lands_in_the_summary() {
        let scores = vec![item(Dimension::InternalProcess, "Process Improvement", 3.6)];
        let review =
            synthesize_scores("Amara Okafor", &scores, ReviewPeriod::Monthly { month: 9 });
        assert!(review.summary.contains("strong performance this month"));
    }

    #[test]
    fn meets_baseline_band_between_three_and_three_and_a_half() {
        let scores = vec![item(Dimension::InternalProcess, "Process Improvement", 3.2)];
        let review = synthesize_scores("Amara Okafor", &scores, ReviewPeriod::Yearly);
        assert!(review.summary.contains("meets baseline expectations"));
    }
}
