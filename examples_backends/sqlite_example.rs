use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use sqlite_log_sink::{start_or_exit, SinkConfig};

#[tokio::main]
async fn main() {
    // Location and interval can be overridden through LOG_SINK_* variables,
    // e.g. LOG_SINK_LOCATION=sqlite:///tmp/logs.db
    let mut config = SinkConfig::from_env();
    if std::env::var(sqlite_log_sink::env::LOG_SINK_FLUSH_INTERVAL_MS_ENV).is_err() {
        config.flush_interval = Duration::from_millis(500);
    }

    let cancel = CancellationToken::new();
    let tracker = TaskTracker::new();
    let logger = start_or_exit(&config, cancel.clone(), &tracker).await;

    let http = logger.with_label("http");
    let db = logger.with_label("db");

    logger.info("sqlite backend example started");
    http.info("listening on 127.0.0.1:8080");
    db.warn("slow query: 1200ms");

    tokio::time::sleep(Duration::from_secs(1)).await;
    http.info("shutting down");

    // Cancelling the parent token drains the buffer and closes the database.
    cancel.cancel();
    tracker.close();
    tracker.wait().await;

    println!("wrote logs to {} ({:?})", config.location, logger.stats());
}
