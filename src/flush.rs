use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::console;
use crate::record::LogRecord;
use crate::stats::SinkStats;
use crate::store::LogStore;

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FlushReport {
    /// Batch records offered to the store (the bookkeeping entry excluded).
    pub(crate) attempted: usize,
    pub(crate) persisted: usize,
    pub(crate) failed: usize,
}

/// Writes detached batches into a [`LogStore`].
#[derive(Clone)]
pub(crate) struct FlushEngine {
    store: Arc<dyn LogStore>,
    stats: Arc<SinkStats>,
}

impl FlushEngine {
    pub(crate) fn new(store: Arc<dyn LogStore>, stats: Arc<SinkStats>) -> Self {
        FlushEngine { store, stats }
    }

    /// Run `flush` on its own task.
    ///
    /// The returned receiver resolves once every record of the batch has
    /// been offered to the store. If the task dies before reporting, the
    /// receiver resolves to an error, which still means nothing is in flight.
    pub(crate) fn dispatch(&self, batch: Vec<LogRecord>) -> oneshot::Receiver<FlushReport> {
        let (done_tx, done_rx) = oneshot::channel();
        let engine = self.clone();
        tokio::spawn(async move {
            let report = engine.flush(batch).await;
            let _ = done_tx.send(report);
        });
        done_rx
    }

    /// Persist a bookkeeping record followed by the batch, in order.
    ///
    /// A failed insert is reported and skipped; it never stops the rest of
    /// the batch.
    pub(crate) async fn flush(&self, batch: Vec<LogRecord>) -> FlushReport {
        self.stats.flushes.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = self.store.insert(&LogRecord::bookkeeping(batch.len())).await {
            console::diagnostic(&format!("[logger][flush] bookkeeping insert failed: {}", e));
        }

        let mut report = FlushReport {
            attempted: batch.len(),
            ..FlushReport::default()
        };

        for record in &batch {
            match self.store.insert(record).await {
                Ok(()) => report.persisted += 1,
                Err(e) => {
                    report.failed += 1;
                    console::diagnostic(&format!("[logger][flush] log insert failed: {}", e));
                }
            }
        }

        self.stats.persisted.fetch_add(report.persisted as u64, Ordering::Relaxed);
        self.stats.failed.fetch_add(report.failed as u64, Ordering::Relaxed);

        tracing::debug!(
            attempted = report.attempted,
            persisted = report.persisted,
            failed = report.failed,
            "flushing logs: finish"
        );
        report
    }

    pub(crate) async fn close_store(&self) {
        if let Err(e) = self.store.close().await {
            console::diagnostic(&format!("[logger] closing log store failed: {}", e));
        }
    }
}
