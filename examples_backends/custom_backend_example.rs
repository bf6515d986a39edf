use std::sync::Arc;

use async_trait::async_trait;
use sqlite_log_sink::{start_with_store, LogRecord, LogStore, SinkConfig};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Example of plugging in a completely custom backend by implementing the
/// `LogStore` trait directly. Imagine this talks to some proprietary DB for
/// which this crate does not provide a store.
struct MyCustomDbStore;

#[async_trait]
impl LogStore for MyCustomDbStore {
    async fn insert(&self, record: &LogRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Here you would call your own client library for the target DB.
        // For the sake of example we just print the record.
        println!("[my-custom-db] {:?}", record);
        Ok(())
    }

    async fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("[my-custom-db] closed");
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let store: Arc<dyn LogStore> = Arc::new(MyCustomDbStore);
    let config = SinkConfig::new("unused", Duration::from_millis(200));
    let tracker = TaskTracker::new();

    let logger = start_with_store(store, &config, CancellationToken::new(), &tracker);

    logger.info("custom backend example started");
    logger.with_label("billing").warn("simulated warning sent via custom backend");

    tokio::time::sleep(Duration::from_millis(500)).await;

    logger.close();
    tracker.close();
    tracker.wait().await;
}
