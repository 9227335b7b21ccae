use super::domain::{ScorecardSubmission, SubmissionKey};

/// Storage abstraction so the service module can be exercised in isolation.
/// Implementations enforce the one-submission-per-employee-period rule.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, submission: ScorecardSubmission) -> Result<(), RepositoryError>;
    fn exists(&self, key: &SubmissionKey) -> Result<bool, RepositoryError>;
    /// Ordered submissions for an employee within one month, oldest first.
    fn monthly_history(
        &self,
        employee_email: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<ScorecardSubmission>, RepositoryError>;
    /// Every submission recorded for an employee, oldest first.
    fn history(&self, employee_email: &str) -> Result<Vec<ScorecardSubmission>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("a scorecard already exists for this employee and period")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
