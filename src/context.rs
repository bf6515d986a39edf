use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::buffer::EntryBuffer;
use crate::stats::SinkStats;

/// Lifecycle of the background flush scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Flushing on every timer tick that finds pending records.
    Running,
    /// Final flush in progress; the store is closed right after it.
    Draining,
    /// Store closed. Nothing is flushed anymore.
    Closed,
}

const RUNNING: u8 = 0;
const DRAINING: u8 = 1;
const CLOSED: u8 = 2;

#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        StateCell(AtomicU8::new(RUNNING))
    }

    pub(crate) fn get(&self) -> SchedulerState {
        match self.0.load(Ordering::Acquire) {
            RUNNING => SchedulerState::Running,
            DRAINING => SchedulerState::Draining,
            _ => SchedulerState::Closed,
        }
    }

    /// Move Running -> Draining. Only the first caller gets `true`.
    pub(crate) fn begin_drain(&self) -> bool {
        self.0
            .compare_exchange(RUNNING, DRAINING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn finish(&self) {
        self.0.store(CLOSED, Ordering::Release);
    }
}

/// Process-wide sink state shared by every logger handle and the scheduler.
#[derive(Debug)]
pub(crate) struct LogContext {
    pub(crate) buffer: EntryBuffer,
    pub(crate) stats: Arc<SinkStats>,
    /// Internal shutdown signal; cancelled by `Logger::close` or by the
    /// bridge from the parent cancellation token.
    pub(crate) shutdown: CancellationToken,
    pub(crate) state: StateCell,
    pub(crate) echo_console: bool,
}

impl LogContext {
    pub(crate) fn new(max_buffered: usize, echo_console: bool) -> Self {
        LogContext {
            buffer: EntryBuffer::new(max_buffered),
            stats: Arc::new(SinkStats::default()),
            shutdown: CancellationToken::new(),
            state: StateCell::new(),
            echo_console,
        }
    }
}
