use crate::infra::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json};
use scorecard_ai::error::AppError;
use scorecard_ai::workflows::feedback::{
    CoreValueClassifier, FeedbackDraft, FeedbackRepository, FeedbackRepositoryError,
    FeedbackServiceError, PeerFeedbackService,
};
use scorecard_ai::workflows::intake::HistoryImporter;
use scorecard_ai::workflows::recognition::{
    AwardPeriod, AwardScope, InMemoryNotificationStore, Notification, Recognition,
    RecognitionCandidate, RecognitionService,
};
use scorecard_ai::workflows::review::{synthesize, PeriodReview, ReviewPeriod};
use scorecard_ai::workflows::scorecard::{
    plan_targets, scorecard_router, Quarter, ScorecardService, SubmissionRepository, TargetEntry,
    TargetMode,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub(crate) fn with_scorecard_routes<R, F, C>(
    scorecards: Arc<ScorecardService<R>>,
    feedback: Arc<PeerFeedbackService<F, C>>,
) -> axum::Router
where
    R: SubmissionRepository + 'static,
    F: FeedbackRepository + 'static,
    C: CoreValueClassifier + 'static,
{
    scorecard_router(scorecards)
        .merge(feedback_router(feedback))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/reviews", post(period_review_endpoint))
        .route("/api/v1/targets/plan", post(target_plan_endpoint))
        .route("/api/v1/recognition/run", post(recognition_run_endpoint))
        .route(
            "/api/v1/notifications/:recipient_email",
            get(notifications_endpoint),
        )
}

fn feedback_router<F, C>(service: Arc<PeerFeedbackService<F, C>>) -> axum::Router
where
    F: FeedbackRepository + 'static,
    C: CoreValueClassifier + 'static,
{
    axum::Router::new()
        .route(
            "/api/v1/feedback/requests",
            post(request_feedback_handler::<F, C>),
        )
        .route("/api/v1/feedback", post(submit_feedback_handler::<F, C>))
        .route(
            "/api/v1/feedback/aggregate/:employee_email",
            get(feedback_aggregate_handler::<F, C>),
        )
        .with_state(service)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedbackRequestPayload {
    pub(crate) manager_email: String,
    pub(crate) employee_email: String,
    pub(crate) employee_name: String,
    pub(crate) year: i32,
    pub(crate) quarter: Quarter,
    pub(crate) reviewers: Vec<String>,
}

pub(crate) async fn request_feedback_handler<F, C>(
    State(service): State<Arc<PeerFeedbackService<F, C>>>,
    Json(payload): Json<FeedbackRequestPayload>,
) -> Response
where
    F: FeedbackRepository + 'static,
    C: CoreValueClassifier + 'static,
{
    match service.request_feedback(
        &payload.manager_email,
        &payload.employee_email,
        &payload.employee_name,
        payload.year,
        payload.quarter,
        payload.reviewers,
    ) {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(error) => feedback_error_response(error),
    }
}

pub(crate) async fn submit_feedback_handler<F, C>(
    State(service): State<Arc<PeerFeedbackService<F, C>>>,
    Json(draft): Json<FeedbackDraft>,
) -> Response
where
    F: FeedbackRepository + 'static,
    C: CoreValueClassifier + 'static,
{
    match service.submit(draft) {
        // Only the aggregate-shaped acknowledgement leaves the server; the
        // stored record would expose the reviewer.
        Ok(record) => {
            let payload = json!({
                "employee_email": record.employee_email,
                "year": record.year,
                "quarter": record.quarter,
                "ratings": record.ratings,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => feedback_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregateQuery {
    pub(crate) year: i32,
    pub(crate) quarter: Quarter,
}

pub(crate) async fn feedback_aggregate_handler<F, C>(
    State(service): State<Arc<PeerFeedbackService<F, C>>>,
    Path(employee_email): Path<String>,
    Query(query): Query<AggregateQuery>,
) -> Response
where
    F: FeedbackRepository + 'static,
    C: CoreValueClassifier + 'static,
{
    match service.aggregate_for(&employee_email, query.year, query.quarter) {
        Ok(aggregate) => (StatusCode::OK, Json(aggregate)).into_response(),
        Err(error) => feedback_error_response(error),
    }
}

fn feedback_error_response(error: FeedbackServiceError) -> Response {
    let status = match &error {
        FeedbackServiceError::Violation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FeedbackServiceError::Repository(FeedbackRepositoryError::RequestNotFound) => {
            StatusCode::NOT_FOUND
        }
        FeedbackServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeriodReviewRequest {
    #[serde(default)]
    pub(crate) employee_email: Option<String>,
    pub(crate) employee_name: String,
    pub(crate) period: ReviewPeriod,
    pub(crate) year: i32,
    /// Upstream history records in either field casing.
    pub(crate) records: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PeriodReviewResponse {
    pub(crate) review: PeriodReview,
    pub(crate) considered_submissions: usize,
}

pub(crate) async fn period_review_endpoint(
    Json(payload): Json<PeriodReviewRequest>,
) -> Result<Json<PeriodReviewResponse>, AppError> {
    let PeriodReviewRequest {
        employee_email,
        employee_name,
        period,
        year,
        records,
    } = payload;

    let mut submissions = HistoryImporter::from_values(&records)?;
    if let Some(email) = employee_email {
        submissions.retain(|submission| submission.employee_email == email);
    }

    let review = synthesize(&employee_name, &submissions, period, year);

    Ok(Json(PeriodReviewResponse {
        considered_submissions: submissions.len(),
        review,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct TargetPlanRequest {
    pub(crate) entries: Vec<TargetEntry>,
    pub(crate) mode: TargetMode,
}

pub(crate) async fn target_plan_endpoint(Json(payload): Json<TargetPlanRequest>) -> Response {
    match plan_targets(payload.entries, payload.mode) {
        Ok(quarters) => (StatusCode::OK, Json(json!({ "quarters": quarters }))).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecognitionRunRequest {
    pub(crate) candidates: Vec<RecognitionCandidate>,
    pub(crate) scopes: Vec<AwardScope>,
    pub(crate) period: AwardPeriod,
    pub(crate) year: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecognitionRunResponse {
    pub(crate) recognitions: Vec<Recognition>,
}

pub(crate) async fn recognition_run_endpoint(
    Extension(notifications): Extension<Arc<InMemoryNotificationStore>>,
    Json(payload): Json<RecognitionRunRequest>,
) -> Response {
    let service = RecognitionService::new(notifications);
    match service.run(
        &payload.candidates,
        &payload.scopes,
        payload.period,
        payload.year,
        chrono::Utc::now(),
    ) {
        Ok(recognitions) => (
            StatusCode::OK,
            Json(RecognitionRunResponse { recognitions }),
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn notifications_endpoint(
    Extension(notifications): Extension<Arc<InMemoryNotificationStore>>,
    Path(recipient_email): Path<String>,
) -> Json<Vec<Notification>> {
    Json(notifications.notifications_for(&recipient_email))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<Value> {
        vec![
            json!({
                "userEmail": "amara@example.org",
                "name": "Amara Okafor",
                "year": 2025,
                "month": 8,
                "week": 1,
                "scores": [
                    {"dimension": "Internal Process", "measure": "Process Improvement",
                     "target": 12, "actual": 14, "rating": 4.6, "weight": 50, "weighted": 2.3},
                    {"dimension": "Learning & Growth", "measure": "Training Hours",
                     "target": 40, "actual": 44, "rating": 4.7, "weight": 10, "weighted": 0.47}
                ],
            }),
            json!({
                "User Email": "amara@example.org",
                "Year": "2024",
                "Month": "8",
                "Week": "1",
                "Scores": "[]",
            }),
        ]
    }

    #[tokio::test]
    async fn period_review_endpoint_scopes_to_the_requested_year() {
        let request = PeriodReviewRequest {
            employee_email: Some("amara@example.org".to_string()),
            employee_name: "Amara Okafor".to_string(),
            period: ReviewPeriod::Quarterly {
                quarter: Quarter::Q3,
            },
            year: 2025,
            records: sample_records(),
        };

        let Json(body) = period_review_endpoint(Json(request))
            .await
            .expect("review builds");

        assert_eq!(body.considered_submissions, 1);
        assert!(body
            .review
            .summary
            .contains("exceptional performance this quarter"));
        assert_eq!(body.review.strengths.len(), 2);
    }

    #[tokio::test]
    async fn period_review_endpoint_rejects_malformed_records() {
        let request = PeriodReviewRequest {
            employee_email: None,
            employee_name: "Amara Okafor".to_string(),
            period: ReviewPeriod::Yearly,
            year: 2025,
            records: vec![json!({ "year": 2025, "month": 1, "scores": [] })],
        };

        let error = period_review_endpoint(Json(request))
            .await
            .expect_err("missing email must fail");
        assert!(matches!(error, AppError::Intake(_)));
    }

    #[tokio::test]
    async fn target_plan_endpoint_rejects_budget_violations() {
        let over_budget = TargetPlanRequest {
            entries: vec![TargetEntry {
                dimension: scorecard_ai::workflows::scorecard::Dimension::InternalProcess,
                measure: "Process Improvement".to_string(),
                target_value: 48.0,
                weight: 75.0,
                frequency: Default::default(),
            }],
            mode: TargetMode::Yearly,
        };
        let response = target_plan_endpoint(Json(over_budget)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn recognition_run_endpoint_publishes_one_notification_per_winner() {
        let notifications = Arc::new(InMemoryNotificationStore::default());
        let request = RecognitionRunRequest {
            candidates: vec![RecognitionCandidate {
                email: "amara@example.org".to_string(),
                name: "Amara Okafor".to_string(),
                division: "Programs".to_string(),
                entries: vec![scorecard_ai::workflows::recognition::RatedEntry {
                    rating: 4.5,
                    weight: 100.0,
                }],
                peer_feedback_score: None,
            }],
            scopes: vec![
                AwardScope::Department("Programs".to_string()),
                AwardScope::Organization,
            ],
            period: AwardPeriod::Month(9),
            year: 2025,
        };

        let response =
            recognition_run_endpoint(Extension(notifications.clone()), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(notifications.notifications_for("amara@example.org").len(), 2);
    }
}
