use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::aggregate::{validate_weights, weighted_score, WeightValidationError};
use super::dashboard::{dashboard_summary, quarterly_report, DashboardSummary, QuarterlyReport};
use super::domain::{
    Quarter, ScoreLineDraft, ScoreLineItem, ScorecardSubmission, SubmissionDraft,
};
use super::progress::ScoringContext;
use super::rating::{achievement_rating, financial_rating, round1, round2};
use super::repository::{RepositoryError, SubmissionRepository};
use super::targets::PEER_REVIEW_WEIGHT;
use crate::workflows::feedback::FeedbackAggregate;
use crate::workflows::review::{synthesize, PeriodReview, ReviewPeriod};

/// Service wrapping the scoring engine around a submission store. Ratings and
/// weighted scores are always recomputed here; client-supplied derived fields
/// are ignored.
pub struct ScorecardService<R> {
    repository: Arc<R>,
}

impl<R> ScorecardService<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and persist a scorecard. The peer-feedback aggregate is a
    /// caller-supplied snapshot for the submission's quarter; `None` renders
    /// the peer-review line as not-yet-rated.
    pub fn submit(
        &self,
        draft: SubmissionDraft,
        peer_feedback: Option<&FeedbackAggregate>,
        submitted_at: DateTime<Utc>,
    ) -> Result<ScorecardSubmission, ScorecardServiceError> {
        let history = self.repository.monthly_history(
            &draft.employee_email,
            draft.year,
            draft.month,
        )?;
        let context = ScoringContext::new(&draft.employee_email, &history);

        let scores: Vec<ScoreLineItem> = draft
            .scores
            .iter()
            .map(|line| score_line(line, &context, peer_feedback))
            .collect();

        validate_weights(&scores)?;

        let submission = ScorecardSubmission {
            employee_email: draft.employee_email,
            employee_name: draft.employee_name,
            job_title: draft.job_title,
            division: draft.division,
            level: draft.level,
            year: draft.year,
            month: draft.month,
            week: draft.week,
            progress_frequency: draft.progress_frequency,
            scores,
            submitted_at: Some(submitted_at),
        };

        // Reject duplicates before any write; the repository enforces the
        // same rule again under its own lock.
        if self.repository.exists(&submission.key())? {
            return Err(ScorecardServiceError::DuplicateSubmission);
        }
        match self.repository.insert(submission.clone()) {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => {
                return Err(ScorecardServiceError::DuplicateSubmission)
            }
            Err(other) => return Err(other.into()),
        }

        info!(
            employee = %submission.employee_email,
            year = submission.year,
            month = submission.month,
            week = submission.week,
            score = submission.total_weighted_score(),
            "scorecard recorded"
        );

        Ok(submission)
    }

    pub fn history(
        &self,
        employee_email: &str,
    ) -> Result<Vec<ScorecardSubmission>, ScorecardServiceError> {
        Ok(self.repository.history(employee_email)?)
    }

    pub fn dashboard(&self, employee_email: &str) -> Result<DashboardSummary, ScorecardServiceError> {
        let history = self.repository.history(employee_email)?;
        Ok(dashboard_summary(&history))
    }

    pub fn quarterly(
        &self,
        employee_email: &str,
        year: i32,
        quarter: Quarter,
    ) -> Result<QuarterlyReport, ScorecardServiceError> {
        let history = self.repository.history(employee_email)?;
        Ok(quarterly_report(&history, year, quarter))
    }

    pub fn period_review(
        &self,
        employee_email: &str,
        employee_name: &str,
        period: ReviewPeriod,
        year: i32,
    ) -> Result<PeriodReview, ScorecardServiceError> {
        let history = self.repository.history(employee_email)?;
        Ok(synthesize(employee_name, &history, period, year))
    }
}

/// Derive one stored line from a draft line. Flags follow the dimension
/// conventions; the peer-review line takes its rating from the aggregate and
/// always carries the fixed weight.
fn score_line(
    line: &ScoreLineDraft,
    context: &ScoringContext<'_>,
    peer_feedback: Option<&FeedbackAggregate>,
) -> ScoreLineItem {
    let dimension = line.dimension;
    let mut item = ScoreLineItem {
        dimension,
        measure: line.measure.clone(),
        is_financial: dimension.is_financial(),
        is_cumulative: dimension.is_cumulative(),
        target: line.target,
        actual: line.actual,
        weight: line.weight,
        rating: 0.0,
        weighted: 0.0,
        comment: line.comment.clone(),
        evidence_link: line.evidence_link.clone(),
    };

    if item.is_peer_review() {
        item.weight = Some(PEER_REVIEW_WEIGHT);
        match peer_feedback.and_then(|aggregate| aggregate.average_score) {
            Some(average) => {
                item.actual = round2(average);
                item.rating = round1(average);
                if item.comment.is_none() {
                    let count = peer_feedback.map(|aggregate| aggregate.count).unwrap_or(0);
                    item.comment = Some(format!(
                        "Based on {count} peer review{} evaluating 7 core values.",
                        if count == 1 { "" } else { "s" }
                    ));
                }
            }
            None => {
                item.actual = 0.0;
                item.rating = 0.0;
                if item.comment.is_none() {
                    item.comment =
                        Some("No peer feedback received for this quarter.".to_string());
                }
            }
        }
    } else if item.is_financial {
        item.rating = financial_rating(item.target, item.actual);
    } else if item.is_cumulative {
        item.rating =
            context.cumulative_rating(dimension, &item.measure, item.target, item.actual);
    } else {
        item.rating = achievement_rating(item.target, item.actual);
    }

    item.weighted = weighted_score(item.rating, item.weight_or_zero());
    item
}

/// Error raised by the scorecard service.
#[derive(Debug, thiserror::Error)]
pub enum ScorecardServiceError {
    #[error("a scorecard has already been submitted for this employee, year, month, and week")]
    DuplicateSubmission,
    #[error(transparent)]
    Weights(#[from] WeightValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
