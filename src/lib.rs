pub mod buffer;
pub mod config;
pub mod console;
pub mod context;
pub mod env;
pub mod init;
pub mod layer;
pub mod level;
pub mod location;
pub mod logger;
pub mod noop_store;
pub mod record;
pub mod sqlite;
pub mod stats;
pub mod store;

mod flush;
mod scheduler;

pub use config::SinkConfig;
pub use context::SchedulerState;
pub use init::{start, start_or_exit, start_with_store, SinkError};
pub use level::Level;
pub use logger::Logger;
pub use record::LogRecord;
pub use store::LogStore;
