use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::SubmissionDraft;
use super::repository::SubmissionRepository;
use super::service::{ScorecardService, ScorecardServiceError};
use crate::workflows::feedback::FeedbackAggregate;

/// Router builder exposing HTTP endpoints for scorecard intake and history.
pub fn scorecard_router<R>(service: Arc<ScorecardService<R>>) -> Router
where
    R: SubmissionRepository + 'static,
{
    Router::new()
        .route("/api/v1/scorecards", post(submit_handler::<R>))
        .route(
            "/api/v1/scorecards/:employee_email",
            get(history_handler::<R>),
        )
        .with_state(service)
}

/// Submission payload: the draft plus an optional snapshot of the quarter's
/// peer-feedback aggregate supplied by the caller.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitScorecardRequest {
    #[serde(flatten)]
    pub(crate) draft: SubmissionDraft,
    #[serde(default)]
    pub(crate) peer_feedback: Option<FeedbackAggregate>,
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    axum::Json(request): axum::Json<SubmitScorecardRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.submit(request.draft, request.peer_feedback.as_ref(), Utc::now()) {
        Ok(submission) => {
            let payload = json!({
                "employee_email": submission.employee_email,
                "year": submission.year,
                "month": submission.month,
                "week": submission.week,
                "quarter": submission.quarter().label(),
                "total_weighted_score": submission.total_weighted_score(),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(ScorecardServiceError::DuplicateSubmission) => {
            let payload = json!({
                "error": ScorecardServiceError::DuplicateSubmission.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(ScorecardServiceError::Weights(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path(employee_email): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.history(&employee_email) {
        Ok(submissions) => (StatusCode::OK, axum::Json(submissions)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
