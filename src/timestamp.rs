use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Source of "now" for everything in a parse run that falls back to the
/// current time or the current calendar date.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant. Makes parse output reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z", // ISO with offset or Z, frac
    "%Y-%m-%dT%H:%M:%S%#z",    // ISO with offset or Z
    "%Y-%m-%d %H:%M:%S%.f%#z", // Space-separated with offset, frac
    "%Y-%m-%d %H:%M:%S%#z",    // Space-separated with offset
    "%d/%b/%Y:%H:%M:%S %z",    // Apache CLF
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f", // ISO without offset, frac
    "%Y-%m-%dT%H:%M:%S",    // ISO basic
    "%Y-%m-%d %H:%M:%S%.f", // Space-separated with frac
    "%Y-%m-%d %H:%M:%S",    // Basic datetime
];

const TIME_OF_DAY_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S"];

/// Parse a timestamp substring into a UTC instant.
///
/// Offset-less date-times are taken as UTC. A bare date means midnight UTC;
/// a bare time of day is placed on `today`. Comma fractional separators
/// (`08:30:01,123`) are accepted. Returns `None` for anything unrecognized.
pub fn parse_timestamp(raw: &str, today: NaiveDate) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let normalized = raw.replace(',', ".");
    let s = normalized.as_str();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }

    if let Some(time) = parse_time_of_day(s) {
        return Some(today.and_time(time).and_utc());
    }

    parse_epoch(s)
}

/// Never-failing form of [`parse_timestamp`]: anything absent or
/// unparseable becomes `now`.
pub fn normalize_timestamp(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(|r| parse_timestamp(r, now.date_naive()))
        .unwrap_or(now)
}

fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    // A bare time is always UTC, so an explicit Z adds nothing.
    let s = s.strip_suffix('Z').unwrap_or(s);
    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(n) = s.parse::<i64>() {
        // Epoch millis (1e12..1e14 range)
        if (1_000_000_000_000..100_000_000_000_000).contains(&n) {
            let secs = n / 1000;
            let nsecs = ((n % 1000) * 1_000_000) as u32;
            return DateTime::from_timestamp(secs, nsecs);
        }
        // Epoch secs (1e9..1e10 range)
        if (1_000_000_000..10_000_000_000).contains(&n) {
            return DateTime::from_timestamp(n, 0);
        }
        return None;
    }

    // Epoch as float (e.g. "1705312200.123", or JSON's "1705312200123.0")
    if let Ok(f) = s.parse::<f64>() {
        let n = f as i64;
        if (1_000_000_000_000..100_000_000_000_000).contains(&n) {
            return DateTime::from_timestamp_micros((f * 1000.0).round() as i64);
        }
        if (1_000_000_000..10_000_000_000).contains(&n) {
            let frac = ((f - n as f64) * 1_000_000_000.0) as u32;
            return DateTime::from_timestamp(n, frac);
        }
    }
    None
}
