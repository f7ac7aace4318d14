
use logvisor::extract::SpanKind;
use logvisor::parser::{
    EMPTY_LINE_MESSAGE, LogFormat, LogLevel, NO_MESSAGE, classify_entry, parse_key_values,
};
use test_helpers::*;

fn classify(raw: &str) -> logvisor::LogEntry {
    classify_entry(raw, 0, &ctx())
}

// ---------------------------------------------------------------------------
// Empty entries
// ---------------------------------------------------------------------------

#[test]
fn test_whitespace_entry_is_placeholder() {
    let entry = classify("   \t");
    assert_eq!(entry.format, LogFormat::Empty);
    assert_eq!(entry.level, LogLevel::Other);
    assert_eq!(entry.message, EMPTY_LINE_MESSAGE);
    assert_eq!(entry.raw, "   \t");
    assert_eq!(entry.timestamp, fixed_now());
    assert!(entry.details.is_empty());
}

// ---------------------------------------------------------------------------
// Full JSON records
// ---------------------------------------------------------------------------

#[test]
fn test_json_level_is_case_insensitive() {
    let entry = classify(r#"{"level":"Warn","message":"x"}"#);
    assert_eq!(entry.level, LogLevel::Warn);
}

#[test]
fn test_json_unknown_level_is_other() {
    let entry = classify(r#"{"level":"fatal","message":"x"}"#);
    assert_eq!(entry.level, LogLevel::Other);
    let entry = classify(r#"{"message":"no level"}"#);
    assert_eq!(entry.level, LogLevel::Other);
}

#[test]
fn test_json_numeric_level() {
    let entry = classify(r#"{"level":50,"message":"Connection refused"}"#);
    assert_eq!(entry.level, LogLevel::Error);
    let entry = classify(r#"{"level":20,"message":"state"}"#);
    assert_eq!(entry.level, LogLevel::Debug);
}

#[test]
fn test_json_missing_message() {
    assert_eq!(classify(r#"{"level":"info"}"#).message, NO_MESSAGE);
    assert_eq!(classify(r#"{"message":""}"#).message, NO_MESSAGE);
    assert_eq!(classify(r#"{"message":null}"#).message, NO_MESSAGE);
}

#[test]
fn test_json_non_string_message_is_stringified() {
    assert_eq!(classify(r#"{"message":42}"#).message, "42");
}

#[test]
fn test_json_missing_or_bad_timestamp_is_now() {
    assert_eq!(classify(r#"{"message":"x"}"#).timestamp, fixed_now());
    assert_eq!(
        classify(r#"{"timestamp":"around noon","message":"x"}"#).timestamp,
        fixed_now()
    );
}

#[test]
fn test_json_epoch_timestamp() {
    let entry = classify(r#"{"timestamp":1705307400000,"message":"x"}"#);
    assert_eq!(entry.timestamp, ts("2024-01-15T08:30:00Z"));
}

#[test]
fn test_json_float_epoch_millis_timestamp() {
    let entry = classify(r#"{"timestamp":1705307400000.0,"message":"x"}"#);
    assert_eq!(entry.timestamp, ts("2024-01-15T08:30:00Z"));
}

#[test]
fn test_json_details_hold_whole_object() {
    let entry = classify(r#"{"message":"x","nested":{"a":[1,2]},"ok":true}"#);
    assert_eq!(entry.details.len(), 3);
    assert_eq!(entry.details["nested"]["a"][1], 2);
    assert_eq!(entry.details["ok"], true);
}

#[test]
fn test_json_with_surrounding_whitespace() {
    let entry = classify("  {\"level\":\"debug\",\"message\":\"padded\"}\n");
    assert_eq!(entry.format, LogFormat::Json);
    assert_eq!(entry.level, LogLevel::Debug);
    assert_eq!(entry.raw, "  {\"level\":\"debug\",\"message\":\"padded\"}\n");
}

#[test]
fn test_json_array_is_not_a_record() {
    let entry = classify("[1,2,3]");
    assert_eq!(entry.format, LogFormat::Plain);
    assert!(entry.details.is_empty());
    let spans = entry.extracted_data.expect("array surfaces as a fragment");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].kind, SpanKind::Json);
}

#[test]
fn test_broken_json_falls_through() {
    let entry = classify(r#"{"level":"error","message":"cut off"#);
    assert_eq!(entry.format, LogFormat::Leveled);
    assert_eq!(entry.level, LogLevel::Error);
}

// ---------------------------------------------------------------------------
// Leveled lines
// ---------------------------------------------------------------------------

#[test]
fn test_leveled_without_timestamp_uses_now() {
    let entry = classify("ERROR Failed to connect to redis");
    assert_eq!(entry.level, LogLevel::Error);
    assert_eq!(entry.timestamp, fixed_now());
    assert_eq!(entry.message, "ERROR Failed to connect to redis");
}

#[test]
fn test_leveled_keyword_is_case_insensitive() {
    let entry = classify("2024-07-31T10:00:00.000Z [worker] error: boom");
    assert_eq!(entry.level, LogLevel::Error);
    assert_eq!(entry.timestamp, ts("2024-07-31T10:00:00Z"));
}

#[test]
fn test_leveled_warning_maps_to_warn() {
    assert_eq!(classify("WARNING Disk space low").level, LogLevel::Warn);
}

#[test]
fn test_leveled_keyword_inside_word() {
    let entry = classify("2024-07-31T10:00:00.123Z Errors: disk failed");
    assert_eq!(entry.level, LogLevel::Error);
    assert_eq!(entry.timestamp, ts("2024-07-31T10:00:00.123Z"));
    assert_eq!(entry.format, LogFormat::Leveled);

    assert_eq!(classify("ERROR_CODE 7 raised").level, LogLevel::Error);
    assert_eq!(classify("terrorist movie night").level, LogLevel::Error);
}

#[test]
fn test_line_without_keyword_is_plain() {
    let entry = classify("disk failed, retrying");
    assert_eq!(entry.level, LogLevel::Other);
    assert_eq!(entry.format, LogFormat::Plain);
}

#[test]
fn test_leveled_bare_time_uses_clock_date() {
    let entry = classify("10:15:30.123 WARN slow query");
    assert_eq!(entry.timestamp, ts("2024-08-01T10:15:30.123Z"));
}

#[test]
fn test_leveled_bare_time_with_comma() {
    let entry = classify("10:15:30,123 INFO python style");
    assert_eq!(entry.timestamp, ts("2024-08-01T10:15:30.123Z"));
}

#[test]
fn test_leveled_nanosecond_timestamp() {
    let entry = classify("2024-07-31T10:00:00.123456789Z DEBUG tick");
    assert_eq!(entry.timestamp.timestamp_subsec_nanos(), 123_456_789);
}

#[test]
fn test_leveled_space_separated_timestamp() {
    let entry = classify("2024-01-15 08:30:05 ERROR Failed to connect");
    assert_eq!(entry.timestamp, ts("2024-01-15T08:30:05Z"));
}

#[test]
fn test_leveled_message_is_first_line_only() {
    let entry = classify("INFO summary\n  detail one\n  detail two");
    assert_eq!(entry.message, "INFO summary");
    assert_eq!(entry.raw, "INFO summary\n  detail one\n  detail two");
}

#[test]
fn test_leveled_keyword_only_on_first_line() {
    let entry = classify("nothing here\nERROR down below");
    assert_eq!(entry.level, LogLevel::Other);
}

#[test]
fn test_continuation_payload_is_extracted() {
    let entry = classify("DEBUG request body\n{\"id\":7}");
    assert_eq!(entry.message, "DEBUG request body");
    let spans = entry.extracted_data.expect("payload spans");
    assert_eq!(spans[1].kind, SpanKind::Json);
    assert_eq!(spans[1].content, "{\"id\":7}");
}

#[test]
fn test_bracketed_word_attaches_text_spans() {
    let entry = classify("2024-07-31T10:00:00.123Z [main] INFO started");
    let spans = entry.extracted_data.expect("split text spans");
    assert_eq!(spans.len(), 2);
    assert!(spans.iter().all(|s| s.kind == SpanKind::Text));
    assert_eq!(spans[0].content, "2024-07-31T10:00:00.123Z [main]");
    assert_eq!(spans[1].content, " INFO started");
    assert_eq!(entry.message, "2024-07-31T10:00:00.123Z [main] INFO started");
}

// ---------------------------------------------------------------------------
// key=value
// ---------------------------------------------------------------------------

#[test]
fn test_kv_message_overrides() {
    let entry = classify(r#"level=info message="user created" id=7"#);
    assert_eq!(entry.message, "user created");
    assert_eq!(entry.details["id"], "7");
    assert_eq!(entry.format, LogFormat::KeyValue);
}

#[test]
fn test_kv_single_quoted_values() {
    let entry = classify("INFO user='Jane Doe' role=admin");
    assert_eq!(entry.details["user"], "Jane Doe");
    assert_eq!(entry.details["role"], "admin");
    assert_eq!(entry.message, "INFO user='Jane Doe' role=admin");
}

#[test]
fn test_kv_level_key_beats_earlier_keyword() {
    let entry = classify("user=info-bot level=debug message=hello");
    assert_eq!(entry.level, LogLevel::Debug);
}

#[test]
fn test_kv_leading_timestamp_beats_key() {
    let entry = classify("2024-07-31T10:00:00Z INFO timestamp=2020-01-01T00:00:00Z");
    assert_eq!(entry.timestamp, ts("2024-07-31T10:00:00Z"));
}

#[test]
fn test_kv_without_level_keyword_is_plain() {
    let entry = classify("a=1 b=2");
    assert_eq!(entry.format, LogFormat::Plain);
    assert!(entry.details.is_empty());
}

#[test]
fn test_parse_key_values_keeps_order() {
    let fields = parse_key_values("z=1 a=2 m=3");
    let keys: Vec<&str> = fields.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

#[test]
fn test_fallback_keeps_whole_text() {
    let entry = classify("line one\nline two\n");
    assert_eq!(entry.format, LogFormat::Plain);
    assert_eq!(entry.level, LogLevel::Other);
    assert_eq!(entry.message, "line one\nline two");
    assert_eq!(entry.raw, "line one\nline two\n");
    assert!(entry.extracted_data.is_none());
}

#[test]
fn test_fallback_with_xml_is_truncated() {
    let entry = classify("response:\n<status code=\"503\">unavailable</status>");
    assert_eq!(entry.message, "response:");
    let spans = entry.extracted_data.expect("xml span");
    assert_eq!(spans[1].kind, SpanKind::Xml);
}

#[test]
fn test_fatal_is_not_a_level() {
    let entry = classify("FATAL out of memory");
    assert_eq!(entry.level, LogLevel::Other);
}

#[test]
fn test_id_uses_index() {
    let entry = classify_entry("INFO x", 7, &ctx());
    assert!(entry.id.starts_with("log-7-"));
}
