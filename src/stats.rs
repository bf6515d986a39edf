use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every [`Logger`](crate::logger::Logger) handle and
/// the background flush tasks.
#[derive(Debug, Default)]
pub struct SinkStats {
    /// Records accepted into the buffer.
    pub appended: AtomicU64,
    /// Records rejected because the buffer was full.
    pub dropped: AtomicU64,
    /// Flushes run (timer ticks with pending records plus the final drain).
    pub flushes: AtomicU64,
    /// Batch records the store accepted.
    pub persisted: AtomicU64,
    /// Batch records the store rejected.
    pub failed: AtomicU64,
}

impl SinkStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            appended: self.appended.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SinkStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub appended: u64,
    pub dropped: u64,
    pub flushes: u64,
    pub persisted: u64,
    pub failed: u64,
}
