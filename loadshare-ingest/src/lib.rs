//! loadshare-ingest: task import (JSON/CSV coercion) and export.

pub mod export;
pub mod records;

pub use export::{EXPORT_COLUMNS, ExportError, ExportFormat, to_csv, to_json};
pub use records::{
    ImportError, RawTaskRecord, coerce_record, load_tasks_csv, load_tasks_json, parse_tasks_csv,
    parse_tasks_json,
};
