use tokio::time::Duration;

use crate::buffer::DEFAULT_MAX_BUFFERED;
use crate::env::{
    env_parse, env_value, LOG_SINK_ECHO_CONSOLE_ENV, LOG_SINK_FLUSH_INTERVAL_MS_ENV,
    LOG_SINK_LOCATION_ENV, LOG_SINK_MAX_BUFFERED_ENV,
};

/// Shortest accepted flush interval.
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(10);

/// Sink configuration.
///
/// **Fields**
/// - `location`: storage location, see
///   [`parse_location`](crate::location::parse_location).
/// - `flush_interval`: time between two timer ticks. A tick with nothing
///   buffered does nothing.
/// - `max_buffered`: records kept between flushes before new ones are
///   dropped.
/// - `echo_console`: if `true`, every record is also written to stderr as
///   `<severity-prefix><text>`.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    pub location: String,
    pub flush_interval: Duration,
    pub max_buffered: usize,
    pub echo_console: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            location: "logs.db".to_string(),
            flush_interval: Duration::from_secs(1),
            max_buffered: DEFAULT_MAX_BUFFERED,
            echo_console: true,
        }
    }
}

impl SinkConfig {
    pub fn new(location: impl Into<String>, flush_interval: Duration) -> Self {
        Self {
            location: location.into(),
            flush_interval,
            ..Self::default()
        }
    }

    /// Build a config from `LOG_SINK_*` environment variables, keeping the
    /// defaults for anything missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            location: env_value(LOG_SINK_LOCATION_ENV).unwrap_or(defaults.location),
            flush_interval: env_parse::<u64>(LOG_SINK_FLUSH_INTERVAL_MS_ENV)
                .map(Duration::from_millis)
                .unwrap_or(defaults.flush_interval),
            max_buffered: env_parse(LOG_SINK_MAX_BUFFERED_ENV).unwrap_or(defaults.max_buffered),
            echo_console: env_parse(LOG_SINK_ECHO_CONSOLE_ENV).unwrap_or(defaults.echo_console),
        }
    }

    pub fn with_echo_console(mut self, echo: bool) -> Self {
        self.echo_console = echo;
        self
    }

    pub fn with_max_buffered(mut self, max: usize) -> Self {
        self.max_buffered = max;
        self
    }

    /// Flush interval with the minimum enforced to avoid a busy timer.
    pub fn effective_flush_interval(&self) -> Duration {
        self.flush_interval.max(MIN_FLUSH_INTERVAL)
    }
}
