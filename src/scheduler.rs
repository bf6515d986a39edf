use std::sync::Arc;

use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::context::LogContext;
use crate::flush::{FlushEngine, FlushReport};
use crate::record::LogRecord;

/// Background timer that flushes the shared buffer every `interval` and
/// drains it once on shutdown.
pub(crate) struct FlushScheduler {
    ctx: Arc<LogContext>,
    engine: FlushEngine,
    interval: Duration,
}

impl FlushScheduler {
    pub(crate) fn new(ctx: Arc<LogContext>, engine: FlushEngine, interval: Duration) -> Self {
        FlushScheduler { ctx, engine, interval }
    }

    /// Spawn the cancellation bridge and the flush loop on `tracker`.
    ///
    /// Both tasks finish once shutdown has been requested and the drain
    /// flush is done, so `tracker.wait()` after `tracker.close()` resolves
    /// only when the store has been closed.
    pub(crate) fn spawn(self, parent: CancellationToken, tracker: &TaskTracker) {
        tracker.spawn(bridge(parent, self.ctx.shutdown.clone()));
        tracker.spawn(self.run());
    }

    async fn run(self) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.ctx.shutdown.cancelled() => {
                    self.drain().await;
                    return;
                }
                _ = ticker.tick() => {
                    tracing::trace!("checking new logs to flush");
                    if !self.ctx.buffer.is_empty() {
                        let batch = self.ctx.buffer.take_and_clear();
                        if let Some(report) = self.flush_and_wait(batch).await {
                            tracing::debug!(
                                persisted = report.persisted,
                                failed = report.failed,
                                "tick flush done"
                            );
                        }
                    }
                }
            }
        }
    }

    async fn drain(&self) {
        if !self.ctx.state.begin_drain() {
            return;
        }

        let batch = self.ctx.buffer.take_and_clear();
        tracing::info!(pending = batch.len(), "draining log buffer");
        if let Some(report) = self.flush_and_wait(batch).await {
            tracing::info!(
                persisted = report.persisted,
                failed = report.failed,
                "drain flush done"
            );
        }

        // The connection must outlive the last insert of the drain flush.
        self.engine.close_store().await;
        self.ctx.state.finish();
        tracing::info!("log store closed");
    }

    /// `None` when the flush task died before reporting.
    async fn flush_and_wait(&self, batch: Vec<LogRecord>) -> Option<FlushReport> {
        match self.engine.dispatch(batch).await {
            Ok(report) => Some(report),
            Err(_) => {
                tracing::warn!("flush task ended without reporting");
                None
            }
        }
    }
}

/// Forward the parent cancellation into the sink's own shutdown signal.
///
/// Also returns when shutdown was requested directly through
/// `Logger::close`, so the tracker can drain either way.
async fn bridge(parent: CancellationToken, shutdown: CancellationToken) {
    tokio::select! {
        _ = parent.cancelled() => shutdown.cancel(),
        _ = shutdown.cancelled() => {}
    }
}
