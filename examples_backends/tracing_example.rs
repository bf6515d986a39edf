use std::sync::Arc;

use sqlite_log_sink::init::{init_tracing, LayerConfig};
use sqlite_log_sink::noop_store::NoopStore;
use sqlite_log_sink::{start_with_store, SinkConfig};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = SinkConfig::new(":memory:", Duration::from_millis(200)).with_echo_console(false);
    let tracker = TaskTracker::new();
    let cancel = CancellationToken::new();
    let logger = start_with_store(Arc::new(NoopStore), &config, cancel.clone(), &tracker);

    init_tracing(logger.with_label("tracing"), LayerConfig::default())
        .expect("set global subscriber");

    // Only WARN and ERROR reach the sink with the default LayerConfig.
    info!("service started");
    warn!(latency_ms = 950, "upstream slow");
    error!(order_id = 123, "order failed");

    tokio::time::sleep(Duration::from_millis(500)).await;

    cancel.cancel();
    tracker.close();
    tracker.wait().await;
    println!("stats: {:?}", logger.stats());
}
