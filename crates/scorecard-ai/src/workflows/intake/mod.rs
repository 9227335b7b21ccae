//! Legacy-sheet intake: the only place upstream field aliasing is tolerated.
//! CSV exports and JSON record dumps both normalize into
//! [`ScorecardSubmission`] values before any engine logic runs.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::workflows::scorecard::ScorecardSubmission;

#[derive(Debug)]
pub enum HistoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MalformedRecord { index: usize, detail: String },
}

impl std::fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryImportError::Io(err) => write!(f, "failed to read history export: {}", err),
            HistoryImportError::Csv(err) => write!(f, "invalid history CSV data: {}", err),
            HistoryImportError::Json(err) => write!(f, "invalid history JSON data: {}", err),
            HistoryImportError::MalformedRecord { index, detail } => {
                write!(f, "malformed history record at index {}: {}", index, detail)
            }
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(err) => Some(err),
            HistoryImportError::Csv(err) => Some(err),
            HistoryImportError::Json(err) => Some(err),
            HistoryImportError::MalformedRecord { .. } => None,
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for HistoryImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub struct HistoryImporter;

impl HistoryImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ScorecardSubmission>, HistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Import a legacy sheet CSV export. The `Scores` column carries the
    /// embedded JSON array exactly as the sheet stores it.
    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ScorecardSubmission>, HistoryImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut submissions = Vec::new();

        for (index, record) in csv_reader.deserialize::<SheetRow>().enumerate() {
            let row = record?;
            let value = row.into_value();
            let submission = parser::submission_from_value(&value)
                .map_err(|detail| HistoryImportError::MalformedRecord { index, detail })?;
            submissions.push(submission);
        }

        Ok(submissions)
    }

    /// Import a JSON array of upstream records in either field casing.
    pub fn from_json(text: &str) -> Result<Vec<ScorecardSubmission>, HistoryImportError> {
        let records: Vec<Value> = serde_json::from_str(text)?;
        Self::from_values(&records)
    }

    pub fn from_values(
        records: &[Value],
    ) -> Result<Vec<ScorecardSubmission>, HistoryImportError> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                parser::submission_from_value(record)
                    .map_err(|detail| HistoryImportError::MalformedRecord { index, detail })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(rename = "User Email")]
    user_email: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Job", default)]
    job: Option<String>,
    #[serde(rename = "Division", default)]
    division: Option<String>,
    #[serde(rename = "Level", default)]
    level: Option<String>,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Month")]
    month: String,
    #[serde(rename = "Week", default)]
    week: Option<String>,
    #[serde(rename = "Progress Frequency", default)]
    progress_frequency: Option<String>,
    #[serde(rename = "Scores")]
    scores: String,
}

impl SheetRow {
    fn into_value(self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("User Email".to_string(), Value::String(self.user_email));
        if let Some(name) = self.name {
            map.insert("Name".to_string(), Value::String(name));
        }
        if let Some(job) = self.job {
            map.insert("Job".to_string(), Value::String(job));
        }
        if let Some(division) = self.division {
            map.insert("Division".to_string(), Value::String(division));
        }
        if let Some(level) = self.level {
            map.insert("Level".to_string(), Value::String(level));
        }
        map.insert("Year".to_string(), Value::String(self.year));
        map.insert("Month".to_string(), Value::String(self.month));
        if let Some(week) = self.week {
            map.insert("Week".to_string(), Value::String(week));
        }
        if let Some(frequency) = self.progress_frequency {
            map.insert("Progress Frequency".to_string(), Value::String(frequency));
        }
        map.insert("Scores".to_string(), Value::String(self.scores));
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE_CSV: &str = concat!(
        "User Email,Name,Job,Division,Level,Year,Month,Week,Progress Frequency,Scores\n",
        "amara@example.org,Amara Okafor,Program Officer,Programs,L3,2025,9,1,weekly,",
        "\"[{\"\"dimension\"\":\"\"Internal Process\"\",\"\"measure\"\":\"\"Process Improvement\"\",",
        "\"\"target\"\":\"\"12\"\",\"\"actual\"\":\"\"3\"\",\"\"rating\"\":\"\"1.5\"\",\"\"weight\"\":\"\"50\"\",",
        "\"\"weighted\"\":\"\"0.75\"\"}]\"\n",
    );

    #[test]
    fn csv_export_round_trips_into_submissions() {
        let submissions =
            HistoryImporter::from_reader(Cursor::new(SAMPLE_CSV)).expect("import succeeds");
        assert_eq!(submissions.len(), 1);
        let submission = &submissions[0];
        assert_eq!(submission.employee_email, "amara@example.org");
        assert_eq!(submission.year, 2025);
        assert_eq!(submission.month, 9);
        assert_eq!(submission.scores.len(), 1);
        assert_eq!(submission.scores[0].measure, "Process Improvement");
        assert_eq!(submission.scores[0].weight, Some(50.0));
    }

    #[test]
    fn malformed_scores_json_reports_the_record_index() {
        let csv = concat!(
            "User Email,Year,Month,Scores\n",
            "amara@example.org,2025,9,not-json\n",
        );
        let error =
            HistoryImporter::from_reader(Cursor::new(csv)).expect_err("expected a failure");
        match error {
            HistoryImportError::MalformedRecord { index, detail } => {
                assert_eq!(index, 0);
                assert!(detail.contains("not valid JSON"));
            }
            other => panic!("expected malformed record error, got {other:?}"),
        }
    }

    #[test]
    fn from_json_accepts_mixed_field_casing() {
        let text = r#"[
            {"userEmail": "amara@example.org", "year": 2025, "month": 2,
             "scores": [{"dimension": "Customer", "measure": "External Customer Satisfaction",
                          "target": 10, "actual": 9, "weight": 5}]},
            {"User Email": "amara@example.org", "Year": "2025", "Month": "3",
             "Scores": "[]"}
        ]"#;
        let submissions = HistoryImporter::from_json(text).expect("import succeeds");
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[0].scores.len(), 1);
        assert!(submissions[1].scores.is_empty());
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = HistoryImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        assert!(matches!(error, HistoryImportError::Io(_)));
    }
}
