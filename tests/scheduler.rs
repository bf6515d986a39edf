mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{quiet_config, RecordingStore, StoreEvent};
use sqlite_log_sink::{start_with_store, Level, Logger, SchedulerState};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

const INTERVAL: Duration = Duration::from_secs(1);

struct Harness {
    store: Arc<RecordingStore>,
    logger: Logger,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl Harness {
    fn new(store: RecordingStore) -> Self {
        let store = Arc::new(store);
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();
        let logger = start_with_store(
            store.clone(),
            &quiet_config(":memory:", INTERVAL),
            cancel.clone(),
            &tracker,
        );
        Harness {
            store,
            logger,
            cancel,
            tracker,
        }
    }

    async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_tick_flushes_bookkeeping_then_records() {
    let h = Harness::new(RecordingStore::default());

    h.logger.with_label("svc").info("started");
    sleep(INTERVAL + Duration::from_millis(500)).await;

    let events = h.store.events();
    assert_eq!(events.len(), 2);
    match (&events[0], &events[1]) {
        (StoreEvent::Insert(bookkeeping), StoreEvent::Insert(record)) => {
            assert_eq!(bookkeeping.prefix.as_deref(), Some("logger"));
            assert_eq!(bookkeeping.level, Level::Info);
            assert_eq!(bookkeeping.text, "flushing 1 records");
            assert_eq!(record.prefix.as_deref(), Some("svc"));
            assert_eq!(record.level, Level::Info);
            assert_eq!(record.text, "started");
            assert!(record.timestamp <= bookkeeping.timestamp);
        }
        other => panic!("unexpected events: {:?}", other),
    }
    assert_eq!(h.logger.pending(), 0);
    assert_eq!(h.logger.stats().flushes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_ticks_write_nothing() {
    let h = Harness::new(RecordingStore::default());

    sleep(INTERVAL * 5 + Duration::from_millis(500)).await;

    assert!(h.store.events().is_empty());
    assert_eq!(h.logger.stats().flushes, 0);
    assert_eq!(h.logger.state(), SchedulerState::Running);
}

#[tokio::test(start_paused = true)]
async fn test_records_after_swap_wait_for_next_tick() {
    let h = Harness::new(RecordingStore::default());

    h.logger.info("a");
    sleep(INTERVAL + Duration::from_millis(100)).await;
    h.logger.warn("b");
    h.logger.info("c");
    sleep(INTERVAL).await;

    assert_eq!(
        h.store.texts(),
        vec!["flushing 1 records", "a", "flushing 2 records", "b", "c"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_insert_does_not_abort_batch() {
    let h = Harness::new(RecordingStore::failing_on(&["second"]));

    h.logger.info("first");
    h.logger.info("second");
    h.logger.info("third");
    sleep(INTERVAL + Duration::from_millis(100)).await;

    assert_eq!(
        h.store.texts(),
        vec!["flushing 3 records", "first", "third"]
    );
    assert_eq!(h.store.failed_attempts(), vec!["second"]);

    let stats = h.logger.stats();
    assert_eq!(stats.persisted, 2);
    assert_eq!(stats.failed, 1);

    // the scheduler keeps going after a partial failure
    h.logger.info("fourth");
    sleep(INTERVAL).await;
    assert_eq!(h.store.texts().last().map(String::as_str), Some("fourth"));
}

#[tokio::test(start_paused = true)]
async fn test_drain_flushes_everything_then_closes_once() {
    let h = Harness::new(RecordingStore::slow(Duration::from_millis(50)));

    h.logger.info("one");
    h.logger.warn("two");
    h.logger.with_label("job").info("three");
    h.shutdown().await;

    let events = h.store.events();
    assert_eq!(events.len(), 5);
    assert_eq!(events.last(), Some(&StoreEvent::Close));
    assert_eq!(
        h.store.texts(),
        vec!["flushing 3 records", "one", "two", "three"]
    );
    assert_eq!(h.logger.state(), SchedulerState::Closed);
    assert_eq!(h.logger.stats().flushes, 1);

    // a second shutdown signal is a no-op
    h.logger.close();
    h.cancel.cancel();
    sleep(INTERVAL * 3).await;

    assert_eq!(h.store.closes(), 1);
    assert_eq!(h.store.events().len(), 5);
    assert_eq!(h.logger.stats().flushes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_drain_runs_even_when_buffer_is_empty() {
    let h = Harness::new(RecordingStore::default());

    h.shutdown().await;

    assert_eq!(h.store.texts(), vec!["flushing 0 records"]);
    assert_eq!(h.store.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_from_logger_drains_without_parent_cancel() {
    let h = Harness::new(RecordingStore::default());

    h.logger.info("bye");
    h.logger.close();
    h.tracker.close();
    h.tracker.wait().await;

    assert!(!h.cancel.is_cancelled());
    assert_eq!(h.store.texts(), vec!["flushing 1 records", "bye"]);
    assert_eq!(h.store.closes(), 1);
    assert_eq!(h.logger.state(), SchedulerState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_waits_for_in_flight_tick_flush() {
    let h = Harness::new(RecordingStore::slow(Duration::from_millis(400)));

    h.logger.info("a");
    h.logger.info("b");
    // land inside the tick flush, which takes 3 x 400ms
    sleep(INTERVAL + Duration::from_millis(100)).await;
    h.logger.info("c");
    h.shutdown().await;

    let events = h.store.events();
    assert_eq!(events.last(), Some(&StoreEvent::Close));
    assert_eq!(
        h.store.texts(),
        vec!["flushing 2 records", "a", "b", "flushing 1 records", "c"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_fatal_record_is_kept_for_drain_when_exit_is_hooked() {
    let h = Harness::new(RecordingStore::default());
    let exited = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = Arc::clone(&exited);

    let logger = h
        .logger
        .with_label("core")
        .with_exit_hook(move |_| flag.store(true, std::sync::atomic::Ordering::SeqCst));
    logger.fatal("unrecoverable");
    assert!(exited.load(std::sync::atomic::Ordering::SeqCst));

    h.shutdown().await;
    assert_eq!(h.store.texts(), vec!["flushing 1 records", "unrecoverable"]);
    match &h.store.events()[1] {
        StoreEvent::Insert(record) => assert_eq!(record.level, Level::Fatal),
        other => panic!("unexpected event: {:?}", other),
    }
}
