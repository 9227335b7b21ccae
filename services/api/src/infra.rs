use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use scorecard_ai::workflows::feedback::{
    CoreValue, CoreValueClassifier, FeedbackRepository, FeedbackRepositoryError, FeedbackRequest,
    PeerFeedbackRecord,
};
use scorecard_ai::workflows::recognition::InMemoryNotificationStore;
use scorecard_ai::workflows::scorecard::{
    Quarter, RepositoryError, ScorecardSubmission, SubmissionKey, SubmissionRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) notifications: Arc<InMemoryNotificationStore>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    submissions: Arc<Mutex<Vec<ScorecardSubmission>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
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
        let mut history: Vec<ScorecardSubmission> = guard
            .iter()
            .filter(|submission| submission.employee_email == employee_email)
            .cloned()
            .collect();
        history.sort_by_key(|submission| (submission.year, submission.month, submission.week));
        Ok(history)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFeedbackRepository {
    requests: Arc<Mutex<Vec<FeedbackRequest>>>,
    completed: Arc<Mutex<HashSet<(String, String)>>>,
    records: Arc<Mutex<Vec<PeerFeedbackRecord>>>,
}

impl FeedbackRepository for InMemoryFeedbackRepository {
    fn insert_request(&self, request: FeedbackRequest) -> Result<(), FeedbackRepositoryError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request);
        Ok(())
    }

    fn pending_for(
        &self,
        reviewer_email: &str,
    ) -> Result<Vec<FeedbackRequest>, FeedbackRepositoryError> {
        let completed = self.completed.lock().expect("completion mutex poisoned");
        let guard = self.requests.lock().expect("request mutex poisoned");
        Ok(guard
            .iter()
            .filter(|request| {
                request
                    .reviewers
                    .iter()
                    .any(|reviewer| reviewer == reviewer_email)
                    && !completed.contains(&(request.id.clone(), reviewer_email.to_string()))
            })
            .cloned()
            .collect())
    }

    fn request(&self, id: &str) -> Result<Option<FeedbackRequest>, FeedbackRepositoryError> {
        let guard = self.requests.lock().expect("request mutex poisoned");
        Ok(guard.iter().find(|request| request.id == id).cloned())
    }

    fn complete_request(
        &self,
        id: &str,
        reviewer_email: &str,
    ) -> Result<(), FeedbackRepositoryError> {
        self.completed
            .lock()
            .expect("completion mutex poisoned")
            .insert((id.to_string(), reviewer_email.to_string()));
        Ok(())
    }

    fn insert_record(&self, record: PeerFeedbackRecord) -> Result<(), FeedbackRepositoryError> {
        self.records
            .lock()
            .expect("record mutex poisoned")
            .push(record);
        Ok(())
    }

    fn records_for(
        &self,
        employee_email: &str,
        year: i32,
        quarter: Quarter,
    ) -> Result<Vec<PeerFeedbackRecord>, FeedbackRepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| {
                record.employee_email == employee_email
                    && record.year == year
                    && record.quarter == quarter
            })
            .cloned()
            .collect())
    }
}

/// Stand-in classifier until the NLP service is wired up: every core value
/// receives the same configured rating. Deterministic by construction.
#[derive(Debug, Clone)]
pub(crate) struct UniformClassifier {
    pub(crate) rating: f64,
}

impl Default for UniformClassifier {
    fn default() -> Self {
        Self { rating: 4.0 }
    }
}

impl CoreValueClassifier for UniformClassifier {
    fn classify(&self, entries: &BTreeMap<CoreValue, String>) -> BTreeMap<CoreValue, f64> {
        entries
            .keys()
            .map(|core_value| (*core_value, self.rating))
            .collect()
    }
}

pub(crate) fn parse_quarter(raw: &str) -> Result<Quarter, String> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "Q1" | "1" => Ok(Quarter::Q1),
        "Q2" | "2" => Ok(Quarter::Q2),
        "Q3" | "3" => Ok(Quarter::Q3),
        "Q4" | "4" => Ok(Quarter::Q4),
        other => Err(format!("'{other}' is not a quarter (expected Q1..Q4)")),
    }
}
