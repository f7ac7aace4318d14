//! Groups physical lines into logical entries.
//!
//! A line opens a new entry when it looks like the head of a log record: an
//! ISO date-time or fractional time of day at column 0, a level keyword
//! (optionally indented), or a `timestamp=` key anywhere. Everything else
//! (stack frames, pretty-printed payloads, wrapped text) is appended to the
//! entry before it.

use regex::Regex;
use std::sync::LazyLock;

static BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"\d{4}-\d{2}-\d{2}T",                                          // ISO date-time
        r"|\d{2}:\d{2}:\d{2}[.,]\d+",                                   // time of day
        r"|\s*(?:ERROR|WARN|INFO|DEBUG|TRACE|FATAL|SEVERE)",            // level keyword
        r")",
        r"|timestamp=",
    ))
    .unwrap()
});

enum GroupAction {
    StartNew,
    FlushAndStartNew,
    AddToCurrent,
}

/// Returns true if `line` looks like the first line of a log record.
pub fn starts_new_entry(line: &str) -> bool {
    BOUNDARY_RE.is_match(line)
}

/// Split `input` into logical entries.
///
/// Entries are slices of `input` in source order. Joining them with `\n`
/// gives back `input` exactly. A whitespace-only entry at the start of the
/// input is closed as soon as another line arrives, so leading blank lines
/// come out as entries of their own.
pub fn reassemble(input: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut pending_start: Option<usize> = None;
    let mut offset = 0;

    for line in input.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;

        let action = match pending_start {
            None => GroupAction::StartNew,
            Some(start) => {
                // line_start > start here, so the separator index is in range.
                let pending = &input[start..line_start - 1];
                if pending.trim().is_empty() || starts_new_entry(line) {
                    GroupAction::FlushAndStartNew
                } else {
                    GroupAction::AddToCurrent
                }
            }
        };

        match action {
            GroupAction::StartNew => pending_start = Some(line_start),
            GroupAction::FlushAndStartNew => {
                if let Some(start) = pending_start {
                    tracing::trace!(line = line_start, "multiline: new entry boundary");
                    entries.push(&input[start..line_start - 1]);
                }
                pending_start = Some(line_start);
            }
            GroupAction::AddToCurrent => {}
        }
    }

    if let Some(start) = pending_start {
        entries.push(&input[start..]);
    }
    entries
}
