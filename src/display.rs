use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

use crate::extract::SpanKind;
use crate::parser::{LogEntry, LogLevel};

/// Render a timestamp with a user-supplied `strftime` pattern. Falls back to
/// RFC 3339 if the pattern is invalid.
pub fn format_timestamp(ts: DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(pattern)).is_err() {
        return ts.to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    out
}

/// `<timestamp> <LEVEL> <message>`
pub fn format_entry(entry: &LogEntry, timestamp_format: &str) -> String {
    format!(
        "{} {:<5} {}",
        format_timestamp(entry.timestamp, timestamp_format),
        entry.level.as_str(),
        entry.message
    )
}

/// Indented detail lines: one per field, then one per extracted span.
pub fn format_details(entry: &LogEntry) -> Vec<String> {
    let mut lines: Vec<String> = entry
        .details
        .iter()
        .map(|(k, v)| format!("    {}: {}", k, format_json_value(v)))
        .collect();

    if let Some(spans) = &entry.extracted_data {
        for span in spans {
            let tag = match span.kind {
                SpanKind::Json => "json",
                SpanKind::Xml => "xml",
                SpanKind::Text => "text",
            };
            lines.push(format!("    [{}] {}", tag, span.content.replace('\n', "\n           ")));
        }
    }
    lines
}

/// "Showing X of Y entries."
pub fn format_summary(shown: usize, total: usize) -> String {
    format!("Showing {} of {} entries.", shown, total)
}

pub fn format_level_counts(counts: &[(LogLevel, usize)]) -> String {
    counts
        .iter()
        .map(|(level, n)| format!("{}={}", level.short_name(), n))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_json_value(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => format!("\"{}\"", s),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        // Arrays and objects: compact JSON
        other => other.to_string(),
    }
}
