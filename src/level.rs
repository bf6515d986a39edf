use std::fmt;
use std::str::FromStr;

/// Console prefix written in front of info messages.
pub const LEVEL_PREFIX_INFO: &str = "[info]";
/// Console prefix written in front of warn messages.
pub const LEVEL_PREFIX_WARN: &str = "[warn]";
/// Console prefix written in front of fatal messages.
pub const LEVEL_PREFIX_FATAL: &str = "[fatal]";

/// Severity of a buffered [`LogRecord`](crate::record::LogRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warn,
    Fatal,
}

impl Level {
    /// Textual form stored in the `level` column.
    ///
    /// Rows carry the bare name (`info`), not the bracketed console prefix
    /// (`[info]`); tables that already hold bracketed values will see both.
    /// [`FromStr`] accepts either form.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Fatal => "fatal",
        }
    }

    /// Tag used when echoing a record to the console.
    pub fn prefix(self) -> &'static str {
        match self {
            Level::Info => LEVEL_PREFIX_INFO,
            Level::Warn => LEVEL_PREFIX_WARN,
            Level::Fatal => LEVEL_PREFIX_FATAL,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" | "[info]" => Ok(Level::Info),
            "warn" | "[warn]" => Ok(Level::Warn),
            "fatal" | "[fatal]" => Ok(Level::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
