//! Anonymous peer feedback: request fan-out, free-text validation,
//! classification seam, and privacy-by-aggregation scoring.

mod aggregate;
pub mod domain;
mod guard;
mod service;

pub use aggregate::{aggregate, FeedbackAggregate};
pub use domain::{CoreValue, FeedbackDraft, FeedbackRequest, PeerFeedbackRecord};
pub use guard::{
    FeedbackGuard, FeedbackViolation, LengthReport, LengthShortfall, MIN_FEEDBACK_CHARS,
};
pub use service::{
    CoreValueClassifier, FeedbackRepository, FeedbackRepositoryError, FeedbackServiceError,
    PeerFeedbackService,
};
