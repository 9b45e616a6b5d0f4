//! Import: loosely shaped task records coerced into strict [`Task`]s.
//!
//! JSON input is an array of objects whose fields may be missing, numbers,
//! or numeric strings. CSV input uses the export column layout. Missing
//! fields take the default-row values; anything present but unusable is
//! rejected with the offending field named.

use loadshare_core::{Assignee, Category, EngineError, MAX_LOAD, Task, new_task_id};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::export::EXPORT_COLUMNS;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("expected a JSON array of task records, got {0}")]
    NotAnArray(&'static str),

    #[error("record {index}: {source}")]
    Record { index: usize, source: EngineError },
}

/// A task-like record as found in the wild.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTaskRecord {
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub category: Option<Value>,
    pub freq_per_week: Option<Value>,
    pub minutes_per_occur: Option<Value>,
    pub cognitive_load: Option<Value>,
    pub emotional_load: Option<Value>,
    /// Older exports used the short names.
    pub cognitive: Option<Value>,
    pub emotional: Option<Value>,
    pub assignee: Option<Value>,
}

fn present(v: &Option<Value>) -> Option<&Value> {
    v.as_ref().filter(|v| !v.is_null())
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(id: &str, field: &'static str, v: Option<&Value>, default: f64) -> Result<f64, EngineError> {
    let Some(v) = v else {
        return Ok(default);
    };
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| EngineError::invalid_task(id, field, format!("is not a number: {v}")))
}

fn load(id: &str, field: &'static str, v: Option<&Value>) -> Result<u8, EngineError> {
    let n = number(id, field, v, 0.0)?;
    if n.fract() != 0.0 || !(0.0..=f64::from(MAX_LOAD)).contains(&n) {
        return Err(EngineError::invalid_task(
            id,
            field,
            format!("must be an integer in 0..={MAX_LOAD}, got {n}"),
        ));
    }
    Ok(n as u8)
}

/// Coerce one record, filling documented defaults for missing fields.
pub fn coerce_record(raw: &RawTaskRecord) -> Result<Task, EngineError> {
    let id = present(&raw.id)
        .and_then(text)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(new_task_id);

    let title = match present(&raw.title) {
        None => String::new(),
        Some(v) => text(v).ok_or_else(|| EngineError::invalid_task(&id, "title", format!("is not text: {v}")))?,
    };

    let category = match present(&raw.category) {
        None => Category::Other,
        Some(v) => text(v)
            .ok_or_else(|| format!("is not text: {v}"))
            .and_then(|s| s.parse::<Category>())
            .map_err(|reason| EngineError::invalid_task(&id, "category", reason))?,
    };

    let assignee = match present(&raw.assignee) {
        None => Assignee::A,
        Some(v) => text(v)
            .ok_or_else(|| format!("is not text: {v}"))
            .and_then(|s| s.parse::<Assignee>())
            .map_err(|reason| EngineError::invalid_task(&id, "assignee", reason))?,
    };

    let freq_per_week = number(&id, "freqPerWeek", present(&raw.freq_per_week), 1.0)?;
    let minutes_per_occur = number(&id, "minutesPerOccur", present(&raw.minutes_per_occur), 10.0)?;
    let cognitive_load = load(
        &id,
        "cognitiveLoad",
        present(&raw.cognitive_load).or(present(&raw.cognitive)),
    )?;
    let emotional_load = load(
        &id,
        "emotionalLoad",
        present(&raw.emotional_load).or(present(&raw.emotional)),
    )?;

    let task = Task {
        id,
        title,
        category,
        freq_per_week,
        minutes_per_occur,
        cognitive_load,
        emotional_load,
        assignee,
    };
    task.validate()?;
    Ok(task)
}

/// Coerce every record; ids must be unique within one import.
fn coerce_all(records: impl IntoIterator<Item = RawTaskRecord>) -> Result<Vec<Task>, ImportError> {
    let mut seen = HashSet::new();
    let mut tasks = Vec::new();
    for (index, raw) in records.into_iter().enumerate() {
        let task = coerce_record(&raw).map_err(|source| ImportError::Record { index, source })?;
        if !seen.insert(task.id.clone()) {
            return Err(ImportError::Record {
                index,
                source: EngineError::invalid_task(&task.id, "id", "is already used by an earlier record"),
            });
        }
        tasks.push(task);
    }
    tracing::info!(count = tasks.len(), "imported tasks");
    Ok(tasks)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a JSON array of task records.
pub fn parse_tasks_json(input: &str) -> Result<Vec<Task>, ImportError> {
    let value: Value = serde_json::from_str(input)?;
    let kind = json_kind(&value);
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray(kind));
    };
    let records = items
        .into_iter()
        .map(serde_json::from_value::<RawTaskRecord>)
        .collect::<Result<Vec<_>, _>>()?;
    coerce_all(records)
}

pub fn load_tasks_json(path: impl AsRef<Path>) -> Result<Vec<Task>, ImportError> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tasks_json(&input)
}

/// Parse CSV with a header row; columns are matched by name, unknown ones ignored.
pub fn parse_tasks_csv<R: Read>(reader: R) -> Result<Vec<Task>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let positions: Vec<Option<usize>> = EXPORT_COLUMNS.iter().map(|c| column(*c)).collect();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cell = |i: usize| -> Option<Value> {
            positions[i]
                .and_then(|p| row.get(p))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
        };
        records.push(RawTaskRecord {
            id: cell(0),
            title: cell(1),
            category: cell(2),
            freq_per_week: cell(3),
            minutes_per_occur: cell(4),
            cognitive_load: cell(5),
            emotional_load: cell(6),
            assignee: cell(7),
            ..RawTaskRecord::default()
        });
    }
    coerce_all(records)
}

pub fn load_tasks_csv(path: impl AsRef<Path>) -> Result<Vec<Task>, ImportError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tasks_csv(file)
}
