use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use sqlite_log_sink::noop_store::NoopStore;
use sqlite_log_sink::{start_with_store, SinkConfig};

#[tokio::main]
async fn main() {
    let config = SinkConfig::default().with_echo_console(false);
    let tracker = TaskTracker::new();
    let logger = start_with_store(
        Arc::new(NoopStore::default()),
        &config,
        CancellationToken::new(),
        &tracker,
    );

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        logger.info(format!("default load test message {}", i));
    }

    let elapsed = start.elapsed();
    println!("default config: buffered {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    // Drain whatever is still buffered before exiting
    logger.close();
    tracker.close();
    tracker.wait().await;
    println!("stats: {:?}", logger.stats());
}
