//! Manager-set target planning: dimension weight budgets and the yearly
//! fan-out that splits an annual target evenly across the four quarters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::aggregate::{REQUIRED_TOTAL_WEIGHT, WEIGHT_TOLERANCE};
use super::domain::{Dimension, Frequency, Quarter};
use super::rating::round2;

/// The Internal Customer peer-review line always carries this weight; it is
/// not configurable and is added on top of the manager-entered targets.
pub const PEER_REVIEW_WEIGHT: f64 = 25.0;

/// Maximum manager-assignable weight per dimension. The Customer cap covers
/// only the external-customer measures; the internal-customer peer review is
/// the fixed 25% line.
pub const fn dimension_weight_cap(dimension: Dimension) -> f64 {
    match dimension {
        Dimension::Financial => 15.0,
        Dimension::Customer => 5.0,
        Dimension::InternalProcess => 50.0,
        Dimension::LearningGrowth => 10.0,
    }
}

/// One manager-entered expectation for a measure. Aliases accept the upstream
/// target-list field casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetEntry {
    #[serde(alias = "Dimension")]
    pub dimension: Dimension,
    #[serde(alias = "Measure")]
    pub measure: String,
    #[serde(alias = "targetValue", alias = "Target Value")]
    pub target_value: f64,
    #[serde(alias = "Weight")]
    pub weight: f64,
    #[serde(default, alias = "Frequency")]
    pub frequency: Frequency,
}

/// Whether the manager entered quarterly values directly or annual values to
/// be distributed across all four quarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    Quarterly(Quarter),
    Yearly,
}

/// Targets bound to a single quarter after planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterTargets {
    pub quarter: Quarter,
    pub targets: Vec<TargetEntry>,
}

/// Per-dimension weight usage against its cap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetLine {
    pub dimension: Dimension,
    pub entered: f64,
    pub cap: f64,
}

impl BudgetLine {
    pub fn within_cap(&self) -> bool {
        self.entered <= self.cap
    }
}

/// Itemized weight-budget report covering all four dimensions, rendered into
/// rejection messages when any cap is exceeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReport {
    pub lines: Vec<BudgetLine>,
}

impl BudgetReport {
    pub fn from_entries(entries: &[TargetEntry]) -> Self {
        let lines = Dimension::ordered()
            .into_iter()
            .map(|dimension| BudgetLine {
                dimension,
                entered: entries
                    .iter()
                    .filter(|entry| entry.dimension == dimension)
                    .map(|entry| entry.weight)
                    .sum(),
                cap: dimension_weight_cap(dimension),
            })
            .collect();
        Self { lines }
    }

    pub fn violations(&self) -> Vec<&BudgetLine> {
        self.lines.iter().filter(|line| !line.within_cap()).collect()
    }

    /// Total entered weight plus the fixed peer-review line.
    pub fn total_weight(&self) -> f64 {
        self.lines.iter().map(|line| line.entered).sum::<f64>() + PEER_REVIEW_WEIGHT
    }
}

impl fmt::Display for BudgetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for line in self.violations() {
            if !first {
                write!(f, "; ")?;
            }
            write!(
                f,
                "{}: {}% exceeds limit of {}%",
                line.dimension.label(),
                line.entered,
                line.cap
            )?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TargetValidationError {
    #[error("at least one target is required")]
    Empty,
    #[error("dimension weight budgets exceeded: {0}")]
    DimensionBudgetExceeded(BudgetReport),
    #[error(
        "total weight including the fixed {PEER_REVIEW_WEIGHT}% peer-review line must equal 100% \
         (current total: {total:.1}%)"
    )]
    TotalWeightMismatch { total: f64 },
}

/// Validate a target set and expand it into per-quarter targets. Yearly mode
/// divides each target value by four and writes the same entries into all
/// four quarters.
pub fn plan_targets(
    entries: Vec<TargetEntry>,
    mode: TargetMode,
) -> Result<Vec<QuarterTargets>, TargetValidationError> {
    if entries.is_empty() {
        return Err(TargetValidationError::Empty);
    }

    let report = BudgetReport::from_entries(&entries);
    if !report.violations().is_empty() {
        return Err(TargetValidationError::DimensionBudgetExceeded(report));
    }

    let total = report.total_weight();
    if (total - REQUIRED_TOTAL_WEIGHT).abs() > WEIGHT_TOLERANCE {
        return Err(TargetValidationError::TotalWeightMismatch { total });
    }

    match mode {
        TargetMode::Quarterly(quarter) => Ok(vec![QuarterTargets {
            quarter,
            targets: entries,
        }]),
        TargetMode::Yearly => {
            let quarterly: Vec<TargetEntry> = entries
                .into_iter()
                .map(|entry| TargetEntry {
                    target_value: round2(entry.target_value / 4.0),
                    ..entry
                })
                .collect();
            Ok(Quarter::ordered()
                .into_iter()
                .map(|quarter| QuarterTargets {
                    quarter,
                    targets: quarterly.clone(),
                })
                .collect())
        }
    }
}
