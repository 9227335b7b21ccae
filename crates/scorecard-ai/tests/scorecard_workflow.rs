use std::sync::{Arc, Mutex};

use chrono::Utc;
use scorecard_ai::workflows::feedback::FeedbackAggregate;
use scorecard_ai::workflows::scorecard::{
    scorecard_router, Dimension, Frequency, RepositoryError, ScoreLineDraft, ScorecardService,
    ScorecardServiceError, ScorecardSubmission, SubmissionDraft, SubmissionKey,
    SubmissionRepository, WeightValidationError, PEER_REVIEW_MEASURE,
};
use tower::util::ServiceExt;

#[derive(Default)]
struct MemoryRepository {
    submissions: Mutex<Vec<ScorecardSubmission>>,
}

impl SubmissionRepository for MemoryRepository {
    fn insert(&self, submission: ScorecardSubmission) -> Result<(), RepositoryError> {
        let mut guard = self.submissions.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.key() == submission.key()) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(submission);
        Ok(())
    }

    fn exists(&self, key: &SubmissionKey) -> Result<bool, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        Ok(guard.iter().any(|existing| existing.key() == *key))
    }

    fn monthly_history(
        &self,
        employee_email: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<ScorecardSubmission>, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        let mut history: Vec<ScorecardSubmission> = guard
            .iter()
            .filter(|submission| {
                submission.employee_email == employee_email
                    && submission.year == year
                    && submission.month == month
            })
            .cloned()
            .collect();
        history.sort_by_key(|submission| submission.week);
        Ok(history)
    }

    fn history(&self, employee_email: &str) -> Result<Vec<ScorecardSubmission>, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|submission| submission.employee_email == employee_email)
            .cloned()
            .collect())
    }
}

fn line(
    dimension: Dimension,
    measure: &str,
    target: f64,
    actual: f64,
    weight: Option<f64>,
) -> ScoreLineDraft {
    ScoreLineDraft {
        dimension,
        measure: measure.to_string(),
        target,
        actual,
        weight,
        comment: None,
        evidence_link: None,
    }
}

fn standard_draft(week: u32, process_actual: f64) -> SubmissionDraft {
    SubmissionDraft {
        employee_email: "amara@example.org".to_string(),
        employee_name: "Amara Okafor".to_string(),
        job_title: "Program Officer".to_string(),
        division: "Programs".to_string(),
        level: Some("L3".to_string()),
        year: 2025,
        month: 9,
        week,
        progress_frequency: Frequency::Weekly,
        scores: vec![
            line(Dimension::Financial, "Budget Management", 5000.0, 4500.0, Some(15.0)),
            line(Dimension::Customer, PEER_REVIEW_MEASURE, 0.0, 0.0, Some(25.0)),
            line(
                Dimension::Customer,
                "External Customer Satisfaction",
                10.0,
                9.0,
                Some(5.0),
            ),
            line(
                Dimension::InternalProcess,
                "Process Improvement",
                48.0,
                process_actual,
                Some(45.0),
            ),
            line(Dimension::LearningGrowth, "Training Hours", 40.0, 4.0, Some(10.0)),
        ],
    }
}

fn service() -> ScorecardService<MemoryRepository> {
    ScorecardService::new(Arc::new(MemoryRepository::default()))
}

fn peer_aggregate(score: f64) -> FeedbackAggregate {
    FeedbackAggregate {
        count: 3,
        average_score: Some(score),
    }
}

#[test]
fn submit_recomputes_ratings_and_weighted_scores_server_side() {
    let service = service();
    let submission = service
        .submit(standard_draft(1, 12.0), Some(&peer_aggregate(4.0)), Utc::now())
        .expect("submission accepted");

    let by_measure = |measure: &str| {
        submission
            .scores
            .iter()
            .find(|item| item.measure == measure)
            .unwrap_or_else(|| panic!("line present: {measure}"))
    };

    // Financial: 10% underspend scores 3.2.
    let financial = by_measure("Budget Management");
    assert!(financial.is_financial);
    assert_eq!(financial.rating, 3.2);
    assert_eq!(financial.weighted, 0.48);

    // Peer review carries the aggregate at the fixed 25% weight.
    let peer = by_measure(PEER_REVIEW_MEASURE);
    assert_eq!(peer.weight, Some(25.0));
    assert_eq!(peer.rating, 4.0);
    assert_eq!(peer.weighted, 1.0);

    // External customer: 10% under target scores 2.8.
    let external = by_measure("External Customer Satisfaction");
    assert_eq!(external.rating, 2.8);
    assert_eq!(external.weighted, 0.14);

    // Cumulative week one: 12 of 48 scores 1.5.
    let process = by_measure("Process Improvement");
    assert!(process.is_cumulative);
    assert_eq!(process.rating, 1.5);
    assert_eq!(process.weighted, 0.68);

    let training = by_measure("Training Hours");
    assert_eq!(training.rating, 1.2);
    assert_eq!(training.weighted, 0.12);

    assert!((submission.total_weighted_score() - 2.42).abs() < 1e-9);
    assert_eq!(submission.quarter().label(), "Q3");
}

#[test]
fn cumulative_rating_accumulates_prior_weeks() {
    let service = service();
    service
        .submit(standard_draft(1, 12.0), Some(&peer_aggregate(4.0)), Utc::now())
        .expect("week one accepted");
    let week_two = service
        .submit(standard_draft(2, 20.0), Some(&peer_aggregate(4.0)), Utc::now())
        .expect("week two accepted");

    // 12 recorded + 20 this week = 32 of 48.
    let process = week_two
        .scores
        .iter()
        .find(|item| item.measure == "Process Improvement")
        .expect("process line present");
    assert_eq!(process.rating, 2.3);
}

#[test]
fn duplicate_period_is_rejected_before_any_write() {
    let service = service();
    service
        .submit(standard_draft(1, 12.0), None, Utc::now())
        .expect("first submission accepted");
    let error = service
        .submit(standard_draft(1, 12.0), None, Utc::now())
        .expect_err("duplicate must be rejected");
    assert!(matches!(error, ScorecardServiceError::DuplicateSubmission));

    let history = service.history("amara@example.org").expect("history loads");
    assert_eq!(history.len(), 1);
}

#[test]
fn blank_weight_blocks_the_whole_submission() {
    let service = service();
    let mut draft = standard_draft(1, 12.0);
    draft.scores[3].weight = None;
    let error = service
        .submit(draft, None, Utc::now())
        .expect_err("blank weight must reject");
    assert!(matches!(
        error,
        ScorecardServiceError::Weights(WeightValidationError::IncompleteWeights)
    ));
    assert!(service
        .history("amara@example.org")
        .expect("history loads")
        .is_empty());
}

#[test]
fn off_balance_weights_are_rejected_with_the_total() {
    let service = service();
    let mut draft = standard_draft(1, 12.0);
    draft.scores[4].weight = Some(5.0); // totals 95 instead of 100
    let error = service
        .submit(draft, None, Utc::now())
        .expect_err("mismatch must reject");
    match error {
        ScorecardServiceError::Weights(WeightValidationError::WeightSumMismatch { total }) => {
            assert_eq!(total, 95.0)
        }
        other => panic!("expected weight mismatch, got {other:?}"),
    }
}

#[test]
fn missing_peer_feedback_renders_the_line_as_no_data() {
    let service = service();
    let submission = service
        .submit(standard_draft(1, 12.0), None, Utc::now())
        .expect("submission accepted");
    let peer = submission
        .scores
        .iter()
        .find(|item| item.measure == PEER_REVIEW_MEASURE)
        .expect("peer line present");
    assert_eq!(peer.rating, 0.0);
    assert_eq!(peer.weighted, 0.0);
    assert_eq!(peer.weight, Some(25.0));
    assert_eq!(
        peer.comment.as_deref(),
        Some("No peer feedback received for this quarter.")
    );
}

#[tokio::test]
async fn router_accepts_a_submission_and_rejects_its_duplicate() {
    let router = scorecard_router(Arc::new(service()));
    let payload = serde_json::json!({
        "employee_email": "amara@example.org",
        "employee_name": "Amara Okafor",
        "job_title": "Program Officer",
        "division": "Programs",
        "year": 2025,
        "month": 9,
        "week": 1,
        "progress_frequency": "weekly",
        "scores": [
            {"dimension": "Internal Process", "measure": "Process Improvement",
             "target": 48.0, "actual": 12.0, "weight": 75.0},
            {"dimension": "Customer", "measure": "Internal Customer (Peer Review)",
             "target": 0.0, "actual": 0.0, "weight": 25.0}
        ],
        "peer_feedback": {"count": 2, "average_score": 4.5}
    });

    let request = || {
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/v1/scorecards")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(payload.to_string()))
            .expect("request builds")
    };

    let created = router
        .clone()
        .oneshot(request())
        .await
        .expect("router responds");
    assert_eq!(created.status(), axum::http::StatusCode::CREATED);

    let conflict = router
        .oneshot(request())
        .await
        .expect("router responds");
    assert_eq!(conflict.status(), axum::http::StatusCode::CONFLICT);
}
