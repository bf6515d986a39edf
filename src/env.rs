//! `LOG_SINK_*` variables read by [`SinkConfig::from_env`](crate::config::SinkConfig::from_env).

/// Storage location, e.g. `logs.db` or `sqlite:///var/log/app/logs.db`.
pub const LOG_SINK_LOCATION_ENV: &str = "LOG_SINK_LOCATION";

/// Flush interval in milliseconds.
pub const LOG_SINK_FLUSH_INTERVAL_MS_ENV: &str = "LOG_SINK_FLUSH_INTERVAL_MS";

/// Maximum number of records buffered between two flushes.
pub const LOG_SINK_MAX_BUFFERED_ENV: &str = "LOG_SINK_MAX_BUFFERED";

/// `true`/`false`: echo every record to stderr.
pub const LOG_SINK_ECHO_CONSOLE_ENV: &str = "LOG_SINK_ECHO_CONSOLE";

/// Trimmed value of `key`. Unset, blank or non-unicode values yield `None`.
pub fn env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parsed value of `key`; `None` when unset or unparsable.
pub fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_value(key).and_then(|v| v.parse().ok())
}
