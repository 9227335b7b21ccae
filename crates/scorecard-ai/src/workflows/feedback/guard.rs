use std::fmt;

use serde::Serialize;

use super::domain::{CoreValue, FeedbackDraft};

/// Minimum free-text length per core value. Shorter answers rarely carry
/// enough signal for the classifier to produce a defensible rating.
pub const MIN_FEEDBACK_CHARS: usize = 50;

/// Per-field shortfall detail for rejection messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthShortfall {
    pub core_value: CoreValue,
    pub current: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthReport {
    pub fields: Vec<LengthShortfall>,
}

impl fmt::Display for LengthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for field in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            write!(
                f,
                "{}: needs at least {MIN_FEEDBACK_CHARS} characters (currently {})",
                field.core_value.label(),
                field.current
            )?;
            first = false;
        }
        Ok(())
    }
}

/// Validation errors raised by the feedback guard.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeedbackViolation {
    #[error("feedback entries need more detail: {0}")]
    InsufficientLength(LengthReport),
    #[error("at least one reviewer other than the employee is required")]
    NoReviewers,
}

/// Guard validating drafts and reviewer sets before anything is stored.
#[derive(Debug, Clone, Default)]
pub struct FeedbackGuard;

impl FeedbackGuard {
    /// Each of the seven core values needs a trimmed answer of at least
    /// [`MIN_FEEDBACK_CHARS`] characters. A missing entry counts as empty.
    pub fn validate_draft(&self, draft: &FeedbackDraft) -> Result<(), FeedbackViolation> {
        let mut fields = Vec::new();
        for core_value in CoreValue::ordered() {
            let current = draft
                .entries
                .get(&core_value)
                .map(|text| text.trim().chars().count())
                .unwrap_or(0);
            if current < MIN_FEEDBACK_CHARS {
                fields.push(LengthShortfall {
                    core_value,
                    current,
                });
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(FeedbackViolation::InsufficientLength(LengthReport {
                fields,
            }))
        }
    }

    /// Drop the employee from the reviewer set; an empty remainder rejects
    /// the request.
    pub fn validate_reviewers(
        &self,
        employee_email: &str,
        reviewers: Vec<String>,
    ) -> Result<Vec<String>, FeedbackViolation> {
        let filtered: Vec<String> = reviewers
            .into_iter()
            .filter(|reviewer| !reviewer.eq_ignore_ascii_case(employee_email))
            .collect();

        if filtered.is_empty() {
            Err(FeedbackViolation::NoReviewers)
        } else {
            Ok(filtered)
        }
    }
}
