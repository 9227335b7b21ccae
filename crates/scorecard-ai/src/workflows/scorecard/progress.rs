//! Cumulative progress tracking across a weekly submission history.
//!
//! Callers supply a consistent snapshot of the employee's history for the
//! current window; nothing here reads ambient state.

use serde::Serialize;

use super::domain::{Dimension, Frequency, ScoreLineItem, ScorecardSubmission};
use super::rating::achievement_rating;

/// Weeks available in a reporting window. Monthly-framed quarters run four
/// weekly entries, quarterly framing runs thirteen.
pub const fn weeks_in_period(frequency: Frequency) -> u32 {
    match frequency {
        Frequency::Quarterly => 13,
        Frequency::Weekly | Frequency::Monthly => 4,
    }
}

/// One week's contribution to a measure, for breakdown displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekEntry {
    pub week: u32,
    pub actual: f64,
    pub rating: f64,
}

/// Progress-to-date for a cumulative measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativeProgress {
    pub total_so_far: f64,
    pub remaining: f64,
    pub progress_pct: f64,
    pub weeks_remaining: u32,
}

/// Explicit scoring snapshot: the employee plus the ordered submission
/// history for the current quarter/year window. Replaces what the upstream
/// UI kept in page-global mutable state.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub employee_email: &'a str,
    pub history: &'a [ScorecardSubmission],
}

impl<'a> ScoringContext<'a> {
    pub fn new(employee_email: &'a str, history: &'a [ScorecardSubmission]) -> Self {
        Self {
            employee_email,
            history,
        }
    }

    /// Running total of actuals for a measure across the history window.
    pub fn cumulative_total(&self, dimension: Dimension, measure: &str) -> f64 {
        self.matching_items(dimension, measure)
            .map(|(_, item)| item.actual)
            .sum()
    }

    /// Mean of the non-zero ratings recorded for a measure; 0.0 when nothing
    /// has been rated yet. Display-only for non-cumulative measures.
    pub fn average_rating(&self, dimension: Dimension, measure: &str) -> f64 {
        let mut total = 0.0;
        let mut count = 0u32;
        for (_, item) in self.matching_items(dimension, measure) {
            if item.rating > 0.0 {
                total += item.rating;
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    /// Ordered week-by-week entries for a measure.
    pub fn weekly_breakdown(&self, dimension: Dimension, measure: &str) -> Vec<WeekEntry> {
        self.matching_items(dimension, measure)
            .map(|(submission, item)| WeekEntry {
                week: submission.week,
                actual: item.actual,
                rating: item.rating,
            })
            .collect()
    }

    /// Progress-to-date against a target for a cumulative measure.
    pub fn progress(
        &self,
        dimension: Dimension,
        measure: &str,
        target: f64,
        frequency: Frequency,
    ) -> CumulativeProgress {
        let total_so_far = self.cumulative_total(dimension, measure);
        let progress_pct = if target > 0.0 {
            (total_so_far / target * 100.0).min(100.0)
        } else {
            0.0
        };

        CumulativeProgress {
            total_so_far,
            remaining: (target - total_so_far).max(0.0),
            progress_pct,
            weeks_remaining: weeks_in_period(frequency)
                .saturating_sub(self.history.len() as u32),
        }
    }

    /// Rating for the current period of a cumulative measure: progress to
    /// date plus this week's increment, fed through the achievement formula.
    pub fn cumulative_rating(
        &self,
        dimension: Dimension,
        measure: &str,
        target: f64,
        this_week_actual: f64,
    ) -> f64 {
        let new_total = self.cumulative_total(dimension, measure) + this_week_actual;
        achievement_rating(target, new_total)
    }

    fn matching_items<'m>(
        &self,
        dimension: Dimension,
        measure: &'m str,
    ) -> impl Iterator<Item = (&'a ScorecardSubmission, &'a ScoreLineItem)> + 'm
    where
        'a: 'm,
    {
        let history = self.history;
        history.iter().flat_map(move |submission| {
            submission
                .scores
                .iter()
                .filter(move |item| item.dimension == dimension && item.measure == measure)
                .map(move |item| (submission, item))
        })
    }
}
