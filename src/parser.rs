use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::extract::{Span, extract_fragments, has_structure};
use crate::timestamp::normalize_timestamp;

/// Message given to entries made from whitespace-only text.
pub const EMPTY_LINE_MESSAGE: &str = "--- empty line ---";

/// Message given to JSON records without a usable `message` field.
pub const NO_MESSAGE: &str = "No message";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    #[default]
    Other,
}

impl LogLevel {
    /// Every level, most severe first. `Other` is last.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
        LogLevel::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
            LogLevel::Other => "OTHER",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warn => "WRN",
            LogLevel::Info => "INF",
            LogLevel::Debug => "DBG",
            LogLevel::Trace => "TRC",
            LogLevel::Other => "---",
        }
    }

    /// One of the five known level names, any case. `OTHER` is not a keyword.
    pub fn from_keyword(s: &str) -> Option<LogLevel> {
        match s.to_ascii_uppercase().as_str() {
            "ERROR" => Some(LogLevel::Error),
            "WARN" => Some(LogLevel::Warn),
            "INFO" => Some(LogLevel::Info),
            "DEBUG" => Some(LogLevel::Debug),
            "TRACE" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct UnknownLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("other") {
            return Ok(LogLevel::Other);
        }
        LogLevel::from_keyword(s).ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

/// Which rule produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    Empty,
    Json,
    Syslog,
    KeyValue,
    Leveled,
    Plain,
}

/// One normalized log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub details: Map<String, Value>,
    /// The source text exactly as it appeared, possibly spanning lines.
    pub raw: String,
    pub format: LogFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Vec<Span>>,
}

/// Per-run state shared by every classification in that run.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext {
    /// Fallback for missing timestamps; its date anchors bare times of day.
    pub now: DateTime<Utc>,
}

impl ParseContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn entry_id(&self, index: usize) -> String {
        format!("log-{}-{}", index, self.now.timestamp_millis())
    }
}

/// Leading ISO date-time or bare time, then a level keyword somewhere on the
/// first line. The keyword is a plain substring match, so `Errors:` is ERROR.
static LEVELED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*",
        r"(?:(?P<iso>\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d{1,9})?(?:Z|[+-]\d{2}:?\d{2})?)",
        r"|(?P<time>\d{2}:\d{2}:\d{2}[.,]\d{3}))?",
        r".*?(?P<level>(?i:ERROR|WARN(?:ING)?|INFO|DEBUG|TRACE))",
    ))
    .unwrap()
});

/// `<timestamp> <app>[<pid>]: ...`
static SYSLOG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+ \S+\[\d+\]:").unwrap());

/// Matches a single key=value pair.
/// Captures: (1) key, (2) double-quoted value, (3) single-quoted value, or (4) bare value.
static KV_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)([A-Za-z_@][\w.@\-]*)=(?:"([^"]*)"|'([^']*)'|(\S*))"#).unwrap()
});

/// Keys whose value stands in for a missing leading timestamp.
const KV_TS_KEYS: &[&str] = &["timestamp", "ts", "time"];

struct Classified {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    message: String,
    details: Map<String, Value>,
    format: LogFormat,
    /// Run fragment extraction over `message`.
    extract: bool,
    /// Keep only the first line of `message` even without extracted data.
    first_line_only: bool,
}

type Rule = fn(&str, &ParseContext) -> Option<Classified>;

/// Tried in order; the first rule returning `Some` wins. Text no rule
/// accepts goes to [`classify_plain`].
const RULES: &[Rule] = &[classify_empty, classify_json, classify_leveled];

/// Turn one logical entry into a [`LogEntry`]. Always succeeds.
pub fn classify_entry(raw: &str, index: usize, ctx: &ParseContext) -> LogEntry {
    let classified = RULES
        .iter()
        .find_map(|rule| rule(raw, ctx))
        .unwrap_or_else(|| classify_plain(raw, ctx));
    tracing::trace!(index, format = ?classified.format, "classified entry");

    let mut message = classified.message;
    let mut extracted_data = None;
    if classified.extract {
        let spans = extract_fragments(&message);
        if has_structure(&spans) {
            extracted_data = Some(spans);
        }
    }
    if classified.first_line_only || extracted_data.is_some() {
        message = first_line(&message).to_string();
    }

    LogEntry {
        id: ctx.entry_id(index),
        timestamp: classified.timestamp,
        level: classified.level,
        message,
        details: classified.details,
        raw: raw.to_string(),
        format: classified.format,
        extracted_data,
    }
}

fn classify_empty(raw: &str, ctx: &ParseContext) -> Option<Classified> {
    if !raw.trim().is_empty() {
        return None;
    }
    Some(Classified {
        timestamp: ctx.now,
        level: LogLevel::Other,
        message: EMPTY_LINE_MESSAGE.to_string(),
        details: Map::new(),
        format: LogFormat::Empty,
        extract: false,
        first_line_only: false,
    })
}

fn classify_json(raw: &str, ctx: &ParseContext) -> Option<Classified> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) else {
        return None;
    };

    let timestamp = match object.get("timestamp") {
        Some(Value::String(s)) => normalize_timestamp(Some(s.as_str()), ctx.now),
        Some(Value::Number(n)) => normalize_timestamp(Some(n.to_string().as_str()), ctx.now),
        _ => ctx.now,
    };

    let level = object
        .get("level")
        .and_then(|v| {
            v.as_str()
                .and_then(LogLevel::from_keyword)
                .or_else(|| v.as_u64().and_then(parse_numeric_level))
        })
        .unwrap_or(LogLevel::Other);

    let message = match object.get("message") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        None | Some(Value::Null) | Some(Value::String(_)) => NO_MESSAGE.to_string(),
        Some(other) => other.to_string(),
    };

    Some(Classified {
        timestamp,
        level,
        message,
        details: object,
        format: LogFormat::Json,
        extract: false,
        first_line_only: false,
    })
}

fn classify_leveled(raw: &str, ctx: &ParseContext) -> Option<Classified> {
    let line = first_line(raw);
    let caps = LEVELED_RE.captures(line)?;

    let keyword = &caps["level"];
    let mut level = if keyword.eq_ignore_ascii_case("warning") {
        LogLevel::Warn
    } else {
        LogLevel::from_keyword(keyword).unwrap_or_default()
    };

    let leading_ts = caps.name("iso").or_else(|| caps.name("time"));
    let mut timestamp = normalize_timestamp(leading_ts.map(|m| m.as_str()), ctx.now);

    let details = if line.contains('=') {
        parse_key_values(line)
    } else {
        Map::new()
    };

    let mut message = raw.to_string();
    if let Some(msg) = details.get("message").and_then(Value::as_str) {
        message = msg.to_string();
    }
    if let Some(kv_level) = details
        .get("level")
        .and_then(Value::as_str)
        .and_then(LogLevel::from_keyword)
    {
        level = kv_level;
    }
    if leading_ts.is_none() {
        if let Some(ts) = KV_TS_KEYS
            .iter()
            .find_map(|k| details.get(*k).and_then(Value::as_str))
        {
            timestamp = normalize_timestamp(Some(ts), ctx.now);
        }
    }

    let format = if !details.is_empty() {
        LogFormat::KeyValue
    } else if SYSLOG_RE.is_match(line) {
        LogFormat::Syslog
    } else {
        LogFormat::Leveled
    };

    Some(Classified {
        timestamp,
        level,
        message,
        details,
        format,
        extract: true,
        first_line_only: true,
    })
}

fn classify_plain(raw: &str, ctx: &ParseContext) -> Classified {
    Classified {
        timestamp: ctx.now,
        level: LogLevel::Other,
        message: raw.trim_end_matches(['\r', '\n']).to_string(),
        details: Map::new(),
        format: LogFormat::Plain,
        extract: true,
        first_line_only: false,
    }
}

/// Parse `key=value` tokens. Values may be double- or single-quoted; bare
/// values run to the next whitespace. Later duplicates overwrite earlier ones.
pub fn parse_key_values(line: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    for caps in KV_PAIR_RE.captures_iter(line) {
        let key = &caps[1];
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        fields.insert(key.to_string(), Value::String(value.to_string()));
    }
    fields
}

/// Parse numeric log levels used by Bunyan, Pino, and similar JSON loggers.
/// Convention: 10=trace, 20=debug, 30=info, 40=warn, 50=error.
fn parse_numeric_level(n: u64) -> Option<LogLevel> {
    match n {
        1..=10 => Some(LogLevel::Trace),
        11..=20 => Some(LogLevel::Debug),
        21..=30 => Some(LogLevel::Info),
        31..=40 => Some(LogLevel::Warn),
        41..=50 => Some(LogLevel::Error),
        _ => None,
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
