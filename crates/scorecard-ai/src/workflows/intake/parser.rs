//! Alias-tolerant record normalization. Upstream exports mix sheet-header
//! casing (`Year`, `Target Value`) with camelCase (`year`, `targetValue`),
//! and embed the score lines either as a JSON array or as a JSON string.
//! Everything is converted to canonical types here so no alias check ever
//! reaches engine code.

use serde_json::Value;

use super::normalizer::clean_text;
use crate::workflows::scorecard::{
    Dimension, Frequency, ScoreLineItem, ScorecardSubmission,
};

pub(crate) fn submission_from_value(value: &Value) -> Result<ScorecardSubmission, String> {
    let employee_email = string_field(value, &["User Email", "userEmail", "employeeEmail"])
        .ok_or("missing employee email")?;
    let year = number_field(value, &["Year", "year"]).ok_or("missing year")? as i32;
    let month = number_field(value, &["Month", "month"]).ok_or("missing month")? as u32;
    let week = number_field(value, &["Week", "week"]).unwrap_or(1.0) as u32;

    let scores_value = field(value, &["Scores", "scores"]).ok_or("missing scores")?;
    let scores = score_lines(scores_value)?;

    Ok(ScorecardSubmission {
        employee_email,
        employee_name: string_field(value, &["Name", "name"]).unwrap_or_default(),
        job_title: string_field(value, &["Job", "job"]).unwrap_or_default(),
        division: string_field(value, &["Division", "division"]).unwrap_or_default(),
        level: string_field(value, &["Level", "level"]).filter(|level| !level.is_empty()),
        year,
        month,
        week,
        progress_frequency: frequency_field(value),
        scores,
        submitted_at: None,
    })
}

fn score_lines(value: &Value) -> Result<Vec<ScoreLineItem>, String> {
    // The sheet stores score lines as an embedded JSON string; fresher
    // exports inline the array.
    let parsed;
    let array = match value {
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text)
                .map_err(|err| format!("scores field is not valid JSON: {err}"))?;
            parsed
                .as_array()
                .ok_or("scores field must decode to an array")?
                .clone()
        }
        Value::Array(items) => items.clone(),
        _ => return Err("scores field must be an array or a JSON string".to_string()),
    };

    array.iter().map(score_line).collect()
}

fn score_line(value: &Value) -> Result<ScoreLineItem, String> {
    let dimension_label =
        string_field(value, &["Dimension", "dimension"]).ok_or("score line missing dimension")?;
    let dimension = Dimension::from_label(&dimension_label)
        .ok_or_else(|| format!("unknown dimension '{dimension_label}'"))?;
    let measure = string_field(value, &["Measure", "measure"])
        .map(|raw| clean_text(&raw))
        .ok_or("score line missing measure")?;

    Ok(ScoreLineItem {
        dimension,
        measure,
        is_financial: dimension.is_financial(),
        is_cumulative: dimension.is_cumulative(),
        target: number_field(value, &["target", "targetBudget", "Target Value", "targetValue"])
            .unwrap_or(0.0),
        actual: number_field(value, &["actual", "actualSpent"]).unwrap_or(0.0),
        weight: number_field(value, &["Weight", "weight"]),
        rating: number_field(value, &["Rating", "rating"]).unwrap_or(0.0),
        weighted: number_field(value, &["Weighted", "weighted"]).unwrap_or(0.0),
        comment: string_field(value, &["Comment", "comment"]).filter(|text| !text.is_empty()),
        evidence_link: string_field(value, &["evidence", "evidenceLink", "Evidence Link"])
            .filter(|text| !text.is_empty()),
    })
}

fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| value.get(name))
}

fn string_field(value: &Value, names: &[&str]) -> Option<String> {
    let found = field(value, names)?;
    match found {
        Value::String(text) => Some(clean_text(text)),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Lenient numeric read: numbers and numeric strings parse, anything else
/// (blank, NaN, malformed) reads as absent. Callers choose whether absent
/// means zero (targets, actuals) or blank (weights).
fn number_field(value: &Value, names: &[&str]) -> Option<f64> {
    let found = field(value, names)?;
    let number = match found {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|parsed| parsed.is_finite())
}

fn frequency_field(value: &Value) -> Frequency {
    match string_field(value, &["progressFrequency", "Progress Frequency"]) {
        Some(text) => match text.to_ascii_lowercase().as_str() {
            "monthly" => Frequency::Monthly,
            "quarterly" => Frequency::Quarterly,
            _ => Frequency::Weekly,
        },
        None => Frequency::Weekly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sheet_cased_and_camel_cased_records_normalize_identically() {
        let sheet = json!({
            "User Email": "amara@example.org",
            "Name": "Amara Okafor",
            "Year": "2025",
            "Month": "9",
            "Week": 2,
            "Scores": "[{\"dimension\":\"Financial\",\"measure\":\"Budget Management\",\"targetBudget\":\"5000\",\"actualSpent\":\"4500\",\"rating\":\"3.2\",\"weight\":\"10\",\"weighted\":\"0.32\"}]",
        });
        let camel = json!({
            "userEmail": "amara@example.org",
            "name": "Amara Okafor",
            "year": 2025,
            "month": 9,
            "week": 2,
            "scores": [{
                "dimension": "Financial",
                "measure": "Budget Management",
                "target": 5000,
                "actual": 4500,
                "rating": 3.2,
                "weight": 10,
                "weighted": 0.32,
            }],
        });

        let from_sheet = submission_from_value(&sheet).expect("sheet record parses");
        let from_camel = submission_from_value(&camel).expect("camel record parses");
        assert_eq!(from_sheet, from_camel);
        assert_eq!(from_sheet.year, 2025);
        assert_eq!(from_sheet.scores[0].target, 5000.0);
        assert_eq!(from_sheet.scores[0].actual, 4500.0);
        assert!(from_sheet.scores[0].is_financial);
    }

    #[test]
    fn target_value_alias_is_accepted() {
        let record = json!({
            "userEmail": "amara@example.org",
            "year": 2025,
            "month": 4,
            "scores": [{
                "dimension": "Learning & Growth",
                "measure": "Training Hours",
                "Target Value": "40",
                "actual": 12,
                "weight": 10,
            }],
        });
        let submission = submission_from_value(&record).expect("record parses");
        assert_eq!(submission.scores[0].target, 40.0);
        assert!(submission.scores[0].is_cumulative);
        assert_eq!(submission.week, 1);
    }

    #[test]
    fn malformed_numerics_read_as_zero_but_blank_weight_stays_blank() {
        let record = json!({
            "userEmail": "amara@example.org",
            "year": 2025,
            "month": 1,
            "scores": [{
                "dimension": "Customer",
                "measure": "External Customer Satisfaction",
                "target": "not-a-number",
                "actual": 9,
                "weight": "",
                "rating": "also-bad",
            }],
        });
        let submission = submission_from_value(&record).expect("record parses");
        let line = &submission.scores[0];
        assert_eq!(line.target, 0.0);
        assert_eq!(line.rating, 0.0);
        assert_eq!(line.weight, None);
    }

    #[test]
    fn missing_email_or_unknown_dimension_fails_loudly() {
        let missing_email = json!({ "year": 2025, "month": 1, "scores": [] });
        assert!(submission_from_value(&missing_email).is_err());

        let bad_dimension = json!({
            "userEmail": "amara@example.org",
            "year": 2025,
            "month": 1,
            "scores": [{ "dimension": "Marketing", "measure": "Reach" }],
        });
        let error = submission_from_value(&bad_dimension).expect_err("must fail");
        assert!(error.contains("unknown dimension"));
    }

    #[test]
    fn frequency_aliases_parse_case_insensitively() {
        let record = json!({
            "userEmail": "amara@example.org",
            "year": 2025,
            "month": 1,
            "Progress Frequency": "Quarterly",
            "scores": [],
        });
        let submission = submission_from_value(&record).expect("record parses");
        assert_eq!(submission.progress_frequency, Frequency::Quarterly);
    }
}
