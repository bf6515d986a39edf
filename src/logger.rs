use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::console;
use crate::context::{LogContext, SchedulerState};
use crate::level::Level;
use crate::record::LogRecord;
use crate::stats::StatsSnapshot;

/// Called by [`Logger::fatal`] after the record has been buffered.
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Receives every record written through the severity methods, after it
/// has been buffered.
pub type EchoHook = Arc<dyn Fn(Level, &str) + Send + Sync>;

/// Exit status passed to the exit hook by [`Logger::fatal`].
pub const FATAL_EXIT_CODE: i32 = 1;

/// Caller-facing handle that buffers leveled messages.
///
/// Handles are cheap to clone. Every handle created from the same
/// [`start`](crate::init::start) call shares one buffer and one background
/// flush scheduler; only the label differs.
#[derive(Clone)]
pub struct Logger {
    ctx: Arc<LogContext>,
    prefix: Option<Arc<str>>,
    echo: Option<EchoHook>,
    exit: ExitHook,
}

impl Logger {
    pub(crate) fn new(ctx: Arc<LogContext>) -> Self {
        let echo: Option<EchoHook> = if ctx.echo_console {
            Some(Arc::new(console::echo))
        } else {
            None
        };
        Logger {
            ctx,
            prefix: None,
            echo,
            exit: Arc::new(exit_process),
        }
    }

    /// A handle on the same sink that stamps its records with `label`.
    pub fn with_label(&self, label: impl AsRef<str>) -> Logger {
        let label = label.as_ref();
        Logger {
            ctx: Arc::clone(&self.ctx),
            prefix: (!label.is_empty()).then(|| Arc::from(label)),
            echo: self.echo.clone(),
            exit: Arc::clone(&self.exit),
        }
    }

    /// Replace what [`fatal`](Self::fatal) does after buffering its record.
    /// The default exits the process.
    pub fn with_exit_hook(mut self, hook: impl Fn(i32) + Send + Sync + 'static) -> Logger {
        self.exit = Arc::new(hook);
        self
    }

    /// Send the console mirror of each record to `hook` instead of stderr.
    pub fn with_echo_hook(mut self, hook: impl Fn(Level, &str) + Send + Sync + 'static) -> Logger {
        self.echo = Some(Arc::new(hook));
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn info(&self, text: impl Into<String>) {
        self.log(Level::Info, text.into());
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.log(Level::Warn, text.into());
    }

    /// Buffer and echo the message, then run the exit hook.
    ///
    /// The record only reaches storage if a flush happens to run before the
    /// process is gone; nothing here waits for one.
    pub fn fatal(&self, text: impl Into<String>) {
        self.log(Level::Fatal, text.into());
        (self.exit)(FATAL_EXIT_CODE);
    }

    /// Request shutdown: the scheduler flushes what is buffered one last
    /// time and closes the store.
    ///
    /// Returns immediately. Await the `TaskTracker` handed to `start` to know
    /// when the drain is done. Calling it again is a no-op.
    pub fn close(&self) {
        if !self.ctx.shutdown.is_cancelled() {
            tracing::info!("closing logger");
        }
        self.ctx.shutdown.cancel();
    }

    pub fn state(&self) -> SchedulerState {
        self.ctx.state.get()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.ctx.stats.snapshot()
    }

    /// Records currently waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.ctx.buffer.len()
    }

    fn log(&self, level: Level, text: String) {
        match &self.echo {
            Some(echo) => {
                let line = text.clone();
                self.append(level, text);
                echo(level, &line);
            }
            None => self.append(level, text),
        }
    }

    /// Buffer a record without echoing it.
    pub(crate) fn append(&self, level: Level, text: String) {
        let record = LogRecord::new(self.prefix.as_deref(), level, text);
        let stats = &self.ctx.stats;
        if self.ctx.buffer.append(record) {
            stats.appended.fetch_add(1, Ordering::Relaxed);
        } else if stats.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
            console::diagnostic(&format!(
                "[logger] buffer full ({} records), dropping new log records",
                self.ctx.buffer.capacity_limit()
            ));
        }
    }
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("prefix", &self.prefix)
            .field("echo", &self.echo.is_some())
            .field("state", &self.state())
            .finish()
    }
}
