//! Best-effort stderr side channel.
//!
//! Nothing written here may block or fail the logging path, so write errors
//! are ignored.

use std::io::Write;

use crate::level::Level;

/// Format a record the way it is echoed: `<severity-prefix><text>`.
pub fn format_line(level: Level, text: &str) -> String {
    format!("{}{}", level.prefix(), text)
}

/// Echo a record to stderr.
pub(crate) fn echo(level: Level, text: &str) {
    write_line(&format_line(level, text));
}

/// Report an internal condition (failed insert, failed close) on stderr.
pub(crate) fn diagnostic(message: &str) {
    write_line(message);
}

fn write_line(line: &str) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(handle, "{}", line);
}
