/// One record per supported shape: JSON, syslog-style, key=value, a
/// multi-line stack trace, a debug line carrying a JSON payload, and a trace
/// line.
const SAMPLE_LOGS: &[&str] = &[
    r#"{"level":"error","timestamp":"2024-07-31T10:00:00.123Z","service":"api-gateway","message":"Failed to process request","trace_id":"xyz-123","details":{"code":500,"reason":"upstream service unavailable"}}"#,
    "2024-07-31T10:01:30.456Z my-app[1234]: INFO: User 'admin' logged in successfully",
    r#"timestamp=2024-07-31T10:02:15.789Z level=warn service=db-connector message="Connection pool nearing capacity" usage=95%"#,
    "2024-07-31T10:03:00.000Z my-app[1234]: ERROR: Unhandled exception\njava.lang.NullPointerException\n\tat com.example.MyService.process(MyService.java:42)\n\tat com.example.Main.main(Main.java:10)",
    r#"2024-07-31T10:04:00.000Z my-app[1234]: DEBUG: Received payload: { "user_id": 42, "action": "update" }"#,
    "2024-07-31T10:05:00.000Z my-app[1234]: TRACE: Entering function calculate_score",
];

/// Demonstration input covering every format the parser recognizes.
pub fn sample_logs() -> String {
    SAMPLE_LOGS.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_not_blank() {
        let sample = sample_logs();
        assert!(!sample.trim().is_empty());
        assert_eq!(sample.lines().count(), 9);
    }
}
