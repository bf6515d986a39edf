use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use sqlite_log_sink::noop_store::NoopStore;
use sqlite_log_sink::{start_with_store, SinkConfig};

#[tokio::main]
async fn main() {
    let config = SinkConfig {
        location: ":memory:".to_string(),
        flush_interval: Duration::from_millis(200),
        max_buffered: 50_000,
        echo_console: false,
    };

    let cancel = CancellationToken::new();
    let tracker = TaskTracker::new();
    let logger = start_with_store(Arc::new(NoopStore), &config, cancel.clone(), &tracker);

    // Several producers sharing the same buffer under different labels.
    let n: u64 = 100_000;
    let start = Instant::now();
    let mut producers = Vec::new();
    for worker in 0..4 {
        let logger = logger.with_label(format!("worker-{}", worker));
        producers.push(tokio::spawn(async move {
            for i in 0..n / 4 {
                logger.warn(format!("custom load test message {}", i));
            }
        }));
    }
    for producer in producers {
        let _ = producer.await;
    }

    let elapsed = start.elapsed();
    println!("custom config: buffered {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    sleep(Duration::from_secs(1)).await;

    cancel.cancel();
    tracker.close();
    tracker.wait().await;

    // With a 50k cap, part of the burst may have been dropped between flushes.
    println!("stats: {:?}", logger.stats());
}
