use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::parser::LogEntry;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize entries: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize `entries` as a JSON array.
pub fn to_json(entries: &[LogEntry], pretty: bool) -> Result<String, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::Empty);
    }
    let json = if pretty {
        serde_json::to_string_pretty(entries)?
    } else {
        serde_json::to_string(entries)?
    };
    Ok(json)
}

pub fn write_json(path: &Path, entries: &[LogEntry], pretty: bool) -> Result<(), ExportError> {
    let json = to_json(entries, pretty)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "exported entries");
    Ok(())
}

/// `logs-<timestamp>.json`, with `:` swapped for `-` so the name is valid on
/// every filesystem.
pub fn default_file_name(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    format!("logs-{stamp}.json")
}
