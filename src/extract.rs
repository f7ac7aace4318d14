//! Splits free text into `json`, `xml` and `text` spans.
//!
//! The spans returned by [`extract_fragments`] always tile the input: joined
//! back together they reproduce it byte for byte.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Json,
    Xml,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    #[serde(rename = "type")]
    pub kind: SpanKind,
    pub content: String,
}

impl Span {
    pub fn new(kind: SpanKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(SpanKind::Text, content)
    }
}

/// Candidate fragments, tried left to right. Objects and arrays may contain
/// one level of nesting; XML is `<tag ...>...</tag>` (lazy) or `<tag .../>`.
static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\{(?:[^{}]|\{[^{}]*\})*\}",                                   // JSON object
        "|",
        r"\[(?:[^\[\]]|\[[^\[\]]*\])*\]",                                // JSON array
        "|",
        r"<[A-Za-z][\w:.\-]*(?:\s[^<>]*)?/>",                            // XML self-closing
        "|",
        r"<[A-Za-z][\w:.\-]*(?:\s[^<>]*)?>[\s\S]*?</[A-Za-z][\w:.\-]*\s*>", // XML element
    ))
    .unwrap()
});

/// Scan `text` for embedded JSON/XML fragments.
///
/// A candidate that decodes as JSON becomes a `json` span. One that does not
/// decode but is bracketed by `<`/`>` becomes an `xml` span (tags are not
/// checked for balance). Any other candidate becomes text that closes at the
/// end of the candidate. Input without candidates yields a single `text` span.
pub fn extract_fragments(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for m in FRAGMENT_RE.find_iter(text) {
        match classify_candidate(m.as_str()) {
            // A rejected candidate ends the text run it sits in.
            SpanKind::Text => push_text(&mut spans, &text[cursor..m.end()]),
            kind => {
                push_text(&mut spans, &text[cursor..m.start()]);
                spans.push(Span::new(kind, m.as_str()));
            }
        }
        cursor = m.end();
    }
    push_text(&mut spans, &text[cursor..]);

    if spans.is_empty() {
        spans.push(Span::text(text));
    }
    spans
}

/// True when the spans are worth attaching to an entry: more than one span,
/// or a single span that is not plain text.
pub fn has_structure(spans: &[Span]) -> bool {
    match spans {
        [] => false,
        [only] => only.kind != SpanKind::Text,
        _ => true,
    }
}

fn classify_candidate(candidate: &str) -> SpanKind {
    if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
        SpanKind::Json
    } else if candidate.starts_with('<') && candidate.ends_with('>') {
        SpanKind::Xml
    } else {
        SpanKind::Text
    }
}

fn push_text(spans: &mut Vec<Span>, gap: &str) {
    if !gap.is_empty() {
        spans.push(Span::text(gap));
    }
}
