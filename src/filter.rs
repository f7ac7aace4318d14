use chrono::{DateTime, Utc};

use crate::parser::{LogEntry, LogLevel};

/// Search, level and date-range criteria. The default matches everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring of `message` or `raw`.
    pub search: String,
    /// Levels to keep. Empty keeps every level.
    pub levels: Vec<LogLevel>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl EntryFilter {
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.levels.is_empty() || self.from.is_some() || self.to.is_some()
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.matches_search(entry) && self.matches_level(entry) && self.matches_date(entry)
    }

    fn matches_search(&self, entry: &LogEntry) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        entry.message.to_lowercase().contains(&needle) || entry.raw.to_lowercase().contains(&needle)
    }

    fn matches_level(&self, entry: &LogEntry) -> bool {
        self.levels.is_empty() || self.levels.contains(&entry.level)
    }

    // Both bounds inclusive.
    fn matches_date(&self, entry: &LogEntry) -> bool {
        self.from.is_none_or(|from| entry.timestamp >= from)
            && self.to.is_none_or(|to| entry.timestamp <= to)
    }
}

/// Returns indices of entries matching `filter`, in order.
pub fn filter_entries(entries: &[LogEntry], filter: &EntryFilter) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| filter.matches(entry))
        .map(|(i, _)| i)
        .collect()
}

/// Number of entries per level, for every level in [`LogLevel::ALL`] order.
pub fn level_counts(entries: &[LogEntry]) -> Vec<(LogLevel, usize)> {
    LogLevel::ALL
        .iter()
        .map(|&level| {
            let count = entries.iter().filter(|e| e.level == level).count();
            (level, count)
        })
        .collect()
}
