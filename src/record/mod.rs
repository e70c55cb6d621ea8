//! Benchmark example records: a model response plus its gold reference.
//!
//! Records are read from a JSON array (`.json`) or JSON Lines file. Fields the
//! scorers don't use are kept in [`ExampleRecord::extra`] so prompt templates can
//! still reference them.

pub mod error;
pub mod types;


pub use error::RecordError;
pub use types::{Answer, Choices, ExampleRecord, RecordDetails};

use std::fs;
use std::path::Path;

use tracing::info;

/// Loads every record from `path`.
///
/// A file whose first non-whitespace byte is `[` is parsed as one JSON array;
/// anything else is parsed as JSON Lines, skipping blank lines.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<ExampleRecord>, RecordError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_records(&raw).map_err(|(line, source)| RecordError::Parse {
        path: path.to_path_buf(),
        line,
        source,
    })?;

    info!(path = %path.display(), records = records.len(), "Records loaded");
    Ok(records)
}

fn parse_records(raw: &str) -> Result<Vec<ExampleRecord>, (usize, serde_json::Error)> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw).map_err(|e| (e.line(), e));
    }

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| serde_json::from_str(line).map_err(|e| (i + 1, e)))
        .collect()
}
