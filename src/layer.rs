use crate::level::Level;
use crate::logger::Logger;
use std::fmt::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Targets whose events are never forwarded: this crate's own diagnostics
/// and the database driver it writes through. Forwarding them would make
/// every flush produce new records.
const IGNORED_TARGETS: &[&str] = &[env!("CARGO_CRATE_NAME"), "sqlx"];

/// `tracing_subscriber` layer that buffers `tracing` events into a
/// [`Logger`].
///
/// `ERROR` and `WARN` events become warn records, anything else becomes an
/// info record. Events never turn into fatal records, so the layer cannot
/// terminate the process. Records are not echoed to the console; pair the
/// layer with a `fmt` layer for that.
pub struct SinkLayer {
    logger: Logger,
    min_level: tracing::Level,
}

impl SinkLayer {
    pub fn new(logger: Logger) -> Self {
        SinkLayer {
            logger,
            min_level: tracing::Level::WARN,
        }
    }

    pub fn with_min_level(mut self, level: tracing::Level) -> Self {
        self.min_level = level;
        self
    }
}

fn is_ignored(target: &str) -> bool {
    IGNORED_TARGETS
        .iter()
        .any(|t| target == *t || target.strip_prefix(t).is_some_and(|rest| rest.starts_with("::")))
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // tracing orders levels by verbosity: ERROR < WARN < ... < TRACE
        if *meta.level() > self.min_level || is_ignored(meta.target()) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let level = if *meta.level() <= tracing::Level::WARN {
            Level::Warn
        } else {
            Level::Info
        };
        self.logger.append(level, visitor.finish());
    }
}

/// Collects the `message` field and renders the others as `key=value`.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: String,
}

impl FieldVisitor {
    fn push_field(&mut self, field: &Field, value: &dyn std::fmt::Display) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field, &value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push_field(field, &value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push_field(field, &value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push_field(field, &value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field, &format_args!("{:?}", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LogContext;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    #[test]
    fn forwards_warn_and_error_with_fields() {
        let ctx = Arc::new(LogContext::new(64, false));
        let logger = Logger::new(Arc::clone(&ctx)).with_label("api");
        let subscriber = Registry::default().with(SinkLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app", "not forwarded");
            tracing::warn!(target: "app", order_id = 123, "order slow");
            tracing::error!(target: "app::db", "connection lost");
            tracing::error!(target: "sqlx::query", "driver noise");
        });

        let batch = ctx.buffer.take_and_clear();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].level, Level::Warn);
        assert_eq!(batch[0].text, "order slow order_id=123");
        assert_eq!(batch[0].prefix.as_deref(), Some("api"));
        assert_eq!(batch[1].text, "connection lost");
    }

    #[test]
    fn min_level_info_maps_to_info_records() {
        let ctx = Arc::new(LogContext::new(64, false));
        let layer = SinkLayer::new(Logger::new(Arc::clone(&ctx))).with_min_level(tracing::Level::INFO);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app", ready = true, "listening");
            tracing::debug!(target: "app", "too verbose");
        });

        let batch = ctx.buffer.take_and_clear();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].level, Level::Info);
        assert_eq!(batch[0].text, "listening ready=true");
    }

    #[test]
    fn ignores_own_targets_only_on_module_boundary() {
        assert!(is_ignored("sqlx"));
        assert!(is_ignored("sqlx::query"));
        assert!(!is_ignored("sqlxish"));
        assert!(is_ignored(concat!(env!("CARGO_CRATE_NAME"), "::scheduler")));
    }
}
