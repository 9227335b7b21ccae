//! Recognition ranking: composite scores over a period's rated entries,
//! winner selection per scope, and the notification fan-out.
//!
//! The composite sums `rating × weight / 100` over every entry in the period
//! without dividing by entry count, so an employee who submits more periods
//! accumulates a larger base than one who submits fewer at equal quality.
//! That bias exists upstream and is reproduced deliberately; whether to
//! normalize is an open product question.

mod notify;

pub use notify::{
    recognition_notification, InMemoryNotificationStore, Notification, NotificationError,
    NotificationKind, NotificationPriority, NotificationPublisher,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::scorecard::rating::round2;
use crate::workflows::scorecard::{month_name, Quarter};

/// Weight applied to the peer-feedback average inside the composite.
pub const PEER_FEEDBACK_BONUS_WEIGHT: f64 = 0.25;

/// One rated entry contributing to an employee's composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatedEntry {
    pub rating: f64,
    pub weight: f64,
}

/// An employee's scored history for the period under consideration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionCandidate {
    pub email: String,
    pub name: String,
    pub division: String,
    pub entries: Vec<RatedEntry>,
    #[serde(default)]
    pub peer_feedback_score: Option<f64>,
}

/// A candidate with its computed composite, ready for ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub email: String,
    pub name: String,
    pub division: String,
    pub recognition_score: f64,
    pub data_points: usize,
}

/// Composite recognition score: weighted rating sum, peer bonus, and a
/// consistency bonus of up to one point for low rating variance.
pub fn recognition_score(candidate: &RecognitionCandidate) -> f64 {
    let mut score: f64 = candidate
        .entries
        .iter()
        .map(|entry| entry.rating * entry.weight / 100.0)
        .sum();

    if let Some(peer) = candidate.peer_feedback_score {
        if peer > 0.0 {
            score += peer * PEER_FEEDBACK_BONUS_WEIGHT;
        }
    }

    if candidate.entries.len() > 1 {
        let ratings: Vec<f64> = candidate.entries.iter().map(|entry| entry.rating).collect();
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        let variance = ratings
            .iter()
            .map(|rating| (rating - mean).powi(2))
            .sum::<f64>()
            / ratings.len() as f64;
        score += (1.0 - variance / 2.0).max(0.0);
    }

    score
}

/// Rank candidates by composite score, descending. Employees with no data
/// points are excluded rather than scored as zero, and ties keep roster
/// order (the stable sort is the only tie-break upstream has).
pub fn rank(candidates: &[RecognitionCandidate], department: Option<&str>) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .filter(|candidate| match department {
            Some(division) => candidate.division == division,
            None => true,
        })
        .filter(|candidate| !candidate.entries.is_empty())
        .map(|candidate| RankedCandidate {
            email: candidate.email.clone(),
            name: candidate.name.clone(),
            division: candidate.division.clone(),
            recognition_score: recognition_score(candidate),
            data_points: candidate.entries.len(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.recognition_score
            .partial_cmp(&a.recognition_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Award period; labels follow the upstream display formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardPeriod {
    Month(u32),
    Quarter(Quarter),
    Year,
}

impl AwardPeriod {
    pub const fn award_title(self) -> &'static str {
        match self {
            AwardPeriod::Month(_) => "Employee of the Month",
            AwardPeriod::Quarter(_) => "Employee of the Quarter",
            AwardPeriod::Year => "Employee of the Year",
        }
    }

    pub fn label(self, year: i32) -> String {
        match self {
            AwardPeriod::Month(month) => format!("{} {year}", month_name(month)),
            AwardPeriod::Quarter(quarter) => format!("{} {year}", quarter.label()),
            AwardPeriod::Year => year.to_string(),
        }
    }
}

/// Whether an award covers one department or the whole organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardScope {
    Department(String),
    Organization,
}

/// A computed award. Always rank 1 of the considered candidates; the full
/// set is recomputed and replaced on demand, never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub employee_email: String,
    pub employee_name: String,
    pub award: String,
    pub department: String,
    pub period: String,
    pub score: f64,
    pub rank: u32,
    pub total_candidates: usize,
}

/// Pick the top-ranked candidate for a scope and period, or `None` when no
/// candidate has data.
pub fn select_winner(
    candidates: &[RecognitionCandidate],
    scope: &AwardScope,
    period: AwardPeriod,
    year: i32,
) -> Option<Recognition> {
    let (department_filter, award, department_label) = match scope {
        AwardScope::Department(name) => (
            Some(name.as_str()),
            period.award_title().to_string(),
            Some(name.clone()),
        ),
        AwardScope::Organization => (
            None,
            format!("Organization {}", period.award_title()),
            None,
        ),
    };

    let ranked = rank(candidates, department_filter);
    let winner = ranked.first()?;

    let department = department_label.unwrap_or_else(|| {
        if winner.division.is_empty() {
            "Organization-Wide".to_string()
        } else {
            winner.division.clone()
        }
    });

    Some(Recognition {
        employee_email: winner.email.clone(),
        employee_name: winner.name.clone(),
        award,
        department,
        period: period.label(year),
        score: round2(winner.recognition_score),
        rank: 1,
        total_candidates: ranked.len(),
    })
}

/// Recompute awards for every requested scope and dispatch one notification
/// per winner. The returned list is the full replacement recognition set.
pub struct RecognitionService<P> {
    publisher: Arc<P>,
}

impl<P> RecognitionService<P>
where
    P: NotificationPublisher + 'static,
{
    pub fn new(publisher: Arc<P>) -> Self {
        Self { publisher }
    }

    pub fn run(
        &self,
        candidates: &[RecognitionCandidate],
        scopes: &[AwardScope],
        period: AwardPeriod,
        year: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recognition>, NotificationError> {
        let mut recognitions = Vec::new();
        for scope in scopes {
            if let Some(recognition) = select_winner(candidates, scope, period, year) {
                self.publisher
                    .publish(recognition_notification(&recognition, now))?;
                recognitions.push(recognition);
            }
        }
        Ok(recognitions)
    }
}
