//! Export the task list as JSON or fully-quoted CSV.

use loadshare_core::Task;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Fixed CSV column order.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "id",
    "title",
    "category",
    "freqPerWeek",
    "minutesPerOccur",
    "cognitiveLoad",
    "emotionalLoad",
    "assignee",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "household_load_tasks.json",
            ExportFormat::Csv => "household_load_tasks.csv",
        }
    }

    /// Guess from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }

    pub fn render(&self, tasks: &[Task]) -> Result<String, ExportError> {
        match self {
            ExportFormat::Json => to_json(tasks),
            ExportFormat::Csv => to_csv(tasks),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown format '{other}' (expected json or csv)")),
        }
    }
}

/// Pretty-printed JSON array, same shape `parse_tasks_json` reads back.
pub fn to_json(tasks: &[Task]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Header plus one row per task. Every field is quoted; embedded quotes are doubled.
pub fn to_csv(tasks: &[Task]) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(EXPORT_COLUMNS)?;
    for t in tasks {
        wtr.write_record([
            t.id.clone(),
            t.title.clone(),
            t.category.label().to_string(),
            t.freq_per_week.to_string(),
            t.minutes_per_occur.to_string(),
            t.cognitive_load.to_string(),
            t.emotional_load.to_string(),
            t.assignee.to_string(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadshare_core::{Assignee, Category};

    #[test]
    fn test_csv_quotes_everything() {
        let tasks = vec![
            Task::new("t1", "Fold the \"good\" towels")
                .with_category(Category::Laundry)
                .with_frequency(2.5)
                .with_assignee(Assignee::Shared),
        ];
        let csv = to_csv(&tasks).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            r#""id","title","category","freqPerWeek","minutesPerOccur","cognitiveLoad","emotionalLoad","assignee""#
        );
        assert_eq!(
            lines.next().unwrap(),
            r#""t1","Fold the ""good"" towels","Laundry","2.5","10","0","0","Shared""#
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = to_json(&[Task::new("t1", "Dishes")]).unwrap();
        assert!(json.contains("\"freqPerWeek\": 1.0"));
        assert!(json.contains("\"assignee\": \"A\""));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("x/tasks.CSV")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(Path::new("tasks.json")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(Path::new("tasks.txt")), None);
        assert_eq!(ExportFormat::from_path(Path::new("tasks")), None);
    }
}
