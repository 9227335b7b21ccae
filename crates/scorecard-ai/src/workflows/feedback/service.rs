use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::aggregate::{aggregate, FeedbackAggregate};
use super::domain::{CoreValue, FeedbackDraft, FeedbackRequest, PeerFeedbackRecord};
use super::guard::{FeedbackGuard, FeedbackViolation};
use crate::workflows::scorecard::{Quarter, RATING_CEILING, RATING_FLOOR};

/// Storage abstraction for requests and records. Only the service touches
/// reviewer-level rows; callers receive aggregates.
pub trait FeedbackRepository: Send + Sync {
    fn insert_request(&self, request: FeedbackRequest) -> Result<(), FeedbackRepositoryError>;
    fn pending_for(&self, reviewer_email: &str)
        -> Result<Vec<FeedbackRequest>, FeedbackRepositoryError>;
    fn request(&self, id: &str) -> Result<Option<FeedbackRequest>, FeedbackRepositoryError>;
    fn complete_request(
        &self,
        id: &str,
        reviewer_email: &str,
    ) -> Result<(), FeedbackRepositoryError>;
    fn insert_record(&self, record: PeerFeedbackRecord) -> Result<(), FeedbackRepositoryError>;
    fn records_for(
        &self,
        employee_email: &str,
        year: i32,
        quarter: Quarter,
    ) -> Result<Vec<PeerFeedbackRecord>, FeedbackRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackRepositoryError {
    #[error("feedback request not found")]
    RequestNotFound,
    #[error("feedback store unavailable: {0}")]
    Unavailable(String),
}

/// Seam for the text-to-rating classifier; the engine never calls out itself.
/// Implementations must be deterministic for identical input.
pub trait CoreValueClassifier: Send + Sync {
    fn classify(&self, entries: &BTreeMap<CoreValue, String>) -> BTreeMap<CoreValue, f64>;
}

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> String {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("fbk-{id:06}")
}

/// Service composing the guard, classifier, and repository.
pub struct PeerFeedbackService<R, C> {
    guard: FeedbackGuard,
    repository: Arc<R>,
    classifier: Arc<C>,
}

impl<R, C> PeerFeedbackService<R, C>
where
    R: FeedbackRepository + 'static,
    C: CoreValueClassifier + 'static,
{
    pub fn new(repository: Arc<R>, classifier: Arc<C>) -> Self {
        Self {
            guard: FeedbackGuard,
            repository,
            classifier,
        }
    }

    /// Create a feedback request fanned out to the validated reviewer set.
    pub fn request_feedback(
        &self,
        manager_email: &str,
        employee_email: &str,
        employee_name: &str,
        year: i32,
        quarter: Quarter,
        reviewers: Vec<String>,
    ) -> Result<FeedbackRequest, FeedbackServiceError> {
        let reviewers = self.guard.validate_reviewers(employee_email, reviewers)?;
        let request = FeedbackRequest {
            id: next_request_id(),
            manager_email: manager_email.to_string(),
            employee_email: employee_email.to_string(),
            employee_name: employee_name.to_string(),
            year,
            quarter,
            reviewers,
        };
        self.repository.insert_request(request.clone())?;

        info!(
            employee = %request.employee_email,
            reviewers = request.reviewers.len(),
            quarter = request.quarter.label(),
            "peer feedback requested"
        );

        Ok(request)
    }

    pub fn pending_for(
        &self,
        reviewer_email: &str,
    ) -> Result<Vec<FeedbackRequest>, FeedbackServiceError> {
        Ok(self.repository.pending_for(reviewer_email)?)
    }

    /// Validate a reviewer's draft, classify the free text into ratings, and
    /// store the resulting record.
    pub fn submit(
        &self,
        draft: FeedbackDraft,
    ) -> Result<PeerFeedbackRecord, FeedbackServiceError> {
        self.guard.validate_draft(&draft)?;

        let request = self
            .repository
            .request(&draft.request_id)?
            .ok_or(FeedbackRepositoryError::RequestNotFound)?;

        let ratings: BTreeMap<CoreValue, f64> = self
            .classifier
            .classify(&draft.entries)
            .into_iter()
            .map(|(core_value, rating)| {
                (core_value, rating.clamp(RATING_FLOOR, RATING_CEILING))
            })
            .collect();

        let record = PeerFeedbackRecord {
            reviewer_email: draft.reviewer_email.clone(),
            employee_email: request.employee_email.clone(),
            year: request.year,
            quarter: request.quarter,
            ratings,
            comments: draft.comments,
        };

        self.repository.insert_record(record.clone())?;
        self.repository
            .complete_request(&draft.request_id, &draft.reviewer_email)?;

        info!(
            employee = %record.employee_email,
            quarter = record.quarter.label(),
            "anonymous peer feedback recorded"
        );

        Ok(record)
    }

    /// The employee-visible (and manager-visible) view: count and average
    /// only. Individual records never leave this module.
    pub fn aggregate_for(
        &self,
        employee_email: &str,
        year: i32,
        quarter: Quarter,
    ) -> Result<FeedbackAggregate, FeedbackServiceError> {
        let records = self.repository.records_for(employee_email, year, quarter)?;
        Ok(aggregate(&records))
    }
}

/// Error raised by the feedback service.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackServiceError {
    #[error(transparent)]
    Violation(#[from] FeedbackViolation),
    #[error(transparent)]
    Repository(#[from] FeedbackRepositoryError),
}
