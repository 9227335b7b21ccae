//! Scorecard submission engine: rating formulas, weighted aggregation,
//! cumulative progress, target planning, dashboards, and the submission
//! service with its storage seam.

pub mod aggregate;
pub mod dashboard;
pub mod domain;
pub mod progress;
pub mod rating;
pub mod repository;
pub mod router;
pub mod service;
pub mod targets;

pub use aggregate::{aggregate, validate_weights, ScoreTotals, WeightValidationError};
pub use dashboard::{dashboard_summary, quarterly_report, DashboardSummary, QuarterlyReport};
pub use domain::{
    month_name, Dimension, Frequency, Quarter, ScoreLineDraft, ScoreLineItem,
    ScorecardSubmission, SubmissionDraft, SubmissionKey, PEER_REVIEW_MEASURE,
};
pub use progress::{weeks_in_period, CumulativeProgress, ScoringContext, WeekEntry};
pub use rating::{achievement_rating, financial_rating, RATING_CEILING, RATING_FLOOR};
pub use repository::{RepositoryError, SubmissionRepository};
pub use router::scorecard_router;
pub use service::{ScorecardService, ScorecardServiceError};
pub use targets::{
    dimension_weight_cap, plan_targets, BudgetLine, BudgetReport, QuarterTargets, TargetEntry,
    TargetMode, TargetValidationError, PEER_REVIEW_WEIGHT,
};
