use chrono::{DateTime, Utc};

use crate::level::Level;

/// Prefix stamped on the synthetic record written ahead of every flush.
pub const BOOKKEEPING_PREFIX: &str = "logger";

/// One buffered log entry.
///
/// The timestamp is captured when the record is created, i.e. at append
/// time, so a delayed flush never reorders events in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub prefix: Option<String>,
    pub level: Level,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Build a record stamped with the current time. An empty prefix is
    /// stored as `None`.
    pub fn new(prefix: Option<&str>, level: Level, text: impl Into<String>) -> Self {
        LogRecord {
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
            level,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// The audit entry persisted ahead of a batch of `count` records.
    pub fn bookkeeping(count: usize) -> Self {
        LogRecord::new(
            Some(BOOKKEEPING_PREFIX),
            Level::Info,
            format!("flushing {} records", count),
        )
    }
}
