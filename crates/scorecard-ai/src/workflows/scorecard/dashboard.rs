//! Dashboard aggregations over an employee's submission history: headline
//! stats, per-period groupings, dimension averages, and the score trend that
//! feeds charts downstream.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{month_name, Dimension, Frequency, Quarter, ScorecardSubmission};
use super::rating::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStat {
    pub label: String,
    pub submissions: usize,
    pub average_score: f64,
    pub best_score: f64,
    pub lowest_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionAverage {
    pub dimension: Dimension,
    pub dimension_label: &'static str,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub score: f64,
}

/// Everything the dashboard view renders. Empty history produces empty
/// collections rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DashboardSummary {
    pub total_submissions: usize,
    pub average_score: f64,
    pub best_score: f64,
    pub lowest_score: f64,
    pub yearly: Vec<PeriodStat>,
    pub quarterly: Vec<PeriodStat>,
    pub monthly: Vec<PeriodStat>,
    pub dimension_averages: Vec<DimensionAverage>,
    pub trend: Vec<TrendPoint>,
}

pub fn dashboard_summary(history: &[ScorecardSubmission]) -> DashboardSummary {
    if history.is_empty() {
        return DashboardSummary::default();
    }

    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    let mut by_quarter: BTreeMap<(i32, Quarter), Vec<f64>> = BTreeMap::new();
    let mut by_month: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    let mut dimension_ratings: BTreeMap<Dimension, Vec<f64>> = BTreeMap::new();
    let mut trend: Vec<(i32, u32, u32, f64)> = Vec::new();
    let mut all_scores = Vec::new();

    for submission in history {
        let score = submission.total_weighted_score();
        all_scores.push(score);
        by_year.entry(submission.year).or_default().push(score);
        by_quarter
            .entry((submission.year, submission.quarter()))
            .or_default()
            .push(score);
        by_month
            .entry((submission.year, submission.month))
            .or_default()
            .push(score);
        trend.push((submission.year, submission.month, submission.week, score));

        for item in &submission.scores {
            if item.rating > 0.0 {
                dimension_ratings
                    .entry(item.dimension)
                    .or_default()
                    .push(item.rating);
            }
        }
    }

    trend.sort_by_key(|(year, month, week, _)| (*year, *month, *week));

    // Period tables list the most recent period first.
    let yearly = by_year
        .iter()
        .rev()
        .map(|(year, scores)| period_stat(year.to_string(), scores))
        .collect();
    let quarterly = by_quarter
        .iter()
        .rev()
        .map(|((year, quarter), scores)| {
            period_stat(format!("{year}-{}", quarter.label()), scores)
        })
        .collect();
    let monthly = by_month
        .iter()
        .rev()
        .map(|((year, month), scores)| {
            period_stat(format!("{} {year}", month_name(*month)), scores)
        })
        .collect();

    let dimension_averages = Dimension::ordered()
        .into_iter()
        .filter_map(|dimension| {
            dimension_ratings.get(&dimension).map(|ratings| DimensionAverage {
                dimension,
                dimension_label: dimension.label(),
                average_rating: round2(mean(ratings)),
            })
        })
        .collect();

    DashboardSummary {
        total_submissions: all_scores.len(),
        average_score: round2(mean(&all_scores)),
        best_score: round2(max(&all_scores)),
        lowest_score: round2(min(&all_scores)),
        yearly,
        quarterly,
        monthly,
        dimension_averages,
        trend: trend
            .into_iter()
            .map(|(year, month, week, score)| TrendPoint {
                label: format!("{year}-{month:02} W{week}"),
                score: round2(score),
            })
            .collect(),
    }
}

/// Quarterly review rollup: one row per dimension/measure pair with averages
/// across the quarter's submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureSummary {
    pub dimension: Dimension,
    pub dimension_label: &'static str,
    pub measure: String,
    pub entries: usize,
    pub average_rating: f64,
    pub total_actual: f64,
    pub average_target: f64,
    pub average_weight: f64,
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct QuarterlyReport {
    pub submissions: usize,
    pub frequency_counts: Vec<(String, usize)>,
    pub measures: Vec<MeasureSummary>,
    pub total_weighted_score: f64,
}

pub fn quarterly_report(
    history: &[ScorecardSubmission],
    year: i32,
    quarter: Quarter,
) -> QuarterlyReport {
    let in_quarter: Vec<&ScorecardSubmission> = history
        .iter()
        .filter(|submission| {
            submission.year == year && quarter.contains_month(submission.month)
        })
        .collect();

    if in_quarter.is_empty() {
        return QuarterlyReport::default();
    }

    let mut frequency_counts: BTreeMap<Frequency, usize> = BTreeMap::new();
    // Keyed by (dimension, measure); BTreeMap keeps dimension display order.
    let mut grouped: BTreeMap<(Dimension, String), MeasureAccumulator> = BTreeMap::new();

    for submission in &in_quarter {
        *frequency_counts
            .entry(submission.progress_frequency)
            .or_default() += 1;
        for item in &submission.scores {
            let entry = grouped
                .entry((item.dimension, item.measure.clone()))
                .or_default();
            entry.ratings.push(item.rating);
            entry.actuals.push(item.actual);
            entry.targets.push(item.target);
            entry.weights.push(item.weight_or_zero());
        }
    }

    let measures: Vec<MeasureSummary> = grouped
        .into_iter()
        .map(|((dimension, measure), acc)| acc.summarize(dimension, measure))
        .collect();
    let total_weighted_score = round2(measures.iter().map(|row| row.weighted_score).sum());

    QuarterlyReport {
        submissions: in_quarter.len(),
        frequency_counts: frequency_counts
            .into_iter()
            .map(|(frequency, count)| (frequency.label().to_string(), count))
            .collect(),
        measures,
        total_weighted_score,
    }
}

#[derive(Default)]
struct MeasureAccumulator {
    ratings: Vec<f64>,
    actuals: Vec<f64>,
    targets: Vec<f64>,
    weights: Vec<f64>,
}

impl MeasureAccumulator {
    fn summarize(self, dimension: Dimension, measure: String) -> MeasureSummary {
        let average_rating = mean(&self.ratings);
        let average_weight = mean(&self.weights);
        MeasureSummary {
            dimension,
            dimension_label: dimension.label(),
            measure,
            entries: self.ratings.len(),
            average_rating: round2(average_rating),
            total_actual: round2(self.actuals.iter().sum()),
            average_target: round2(mean(&self.targets)),
            average_weight: round2(average_weight),
            weighted_score: round2(average_rating * average_weight / 100.0),
        }
    }
}

fn period_stat(label: String, scores: &[f64]) -> PeriodStat {
    PeriodStat {
        label,
        submissions: scores.len(),
        average_score: round2(mean(scores)),
        best_score: round2(max(scores)),
        lowest_score: round2(min(scores)),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::MIN, f64::max)
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::MAX, f64::min)
}
