use crate::config::SinkConfig;
use crate::context::LogContext;
use crate::flush::FlushEngine;
use crate::layer::SinkLayer;
use crate::location::{parse_location, LocationError};
use crate::logger::Logger;
use crate::scheduler::FlushScheduler;
use crate::sqlite::{SqliteStore, StoreError};
use crate::store::LogStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Startup failure: the sink could not be brought up at all.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Open the SQLite store named by `config.location` and start buffering.
///
/// **Parameters**
/// - `config`: [`SinkConfig`] with location, flush interval and buffer cap.
/// - `cancel`: parent lifecycle signal. Cancelling it drains the buffer
///   into storage and closes the store, same as [`Logger::close`].
/// - `tracker`: receives the two background tasks. After `tracker.close()`,
///   `tracker.wait().await` resolves once the final flush is done and the
///   store is closed.
///
/// **Returns**
/// - A root [`Logger`] without label.
/// - `Err(..)` if the location is invalid or the database cannot be opened,
///   bootstrapped or prepared.
pub async fn start(
    config: &SinkConfig,
    cancel: CancellationToken,
    tracker: &TaskTracker,
) -> Result<Logger, SinkError> {
    let location = parse_location(&config.location)?;
    let store = SqliteStore::connect(&location).await?;
    Ok(start_with_store(Arc::new(store), config, cancel, tracker))
}

/// Same as [`start`] but exits the process when startup fails.
pub async fn start_or_exit(
    config: &SinkConfig,
    cancel: CancellationToken,
    tracker: &TaskTracker,
) -> Logger {
    match start(config, cancel, tracker).await {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("[logger] {}", e);
            std::process::exit(1);
        }
    }
}

/// Start buffering into a caller-provided [`LogStore`].
///
/// `config.location` is ignored. Must be called from within a Tokio
/// runtime.
pub fn start_with_store(
    store: Arc<dyn LogStore>,
    config: &SinkConfig,
    cancel: CancellationToken,
    tracker: &TaskTracker,
) -> Logger {
    let ctx = Arc::new(LogContext::new(config.max_buffered, config.echo_console));
    let engine = FlushEngine::new(store, Arc::clone(&ctx.stats));

    FlushScheduler::new(Arc::clone(&ctx), engine, config.effective_flush_interval())
        .spawn(cancel, tracker);

    Logger::new(ctx)
}

/// Configuration of the `tracing` bridge installed by [`init_tracing`].
///
/// **Fields**
/// - `min_level`: least severe `tracing` level forwarded into the sink.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is added
///   next to [`SinkLayer`] so events are also printed.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub min_level: tracing::Level,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_level: tracing::Level::WARN,
            enable_stdout: true,
        }
    }
}

/// Install a global `tracing` subscriber that forwards events into `logger`.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already set.
pub fn init_tracing(
    logger: Logger,
    config: LayerConfig,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let layer = SinkLayer::new(logger).with_min_level(config.min_level);

    // Two subscriber shapes because the optional fmt layer changes the type.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    }
}
