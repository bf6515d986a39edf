use crate::record::LogRecord;
use async_trait::async_trait;
use std::error::Error;

/// Durable destination for flushed [`LogRecord`]s.
///
/// The flush engine is the only caller: it offers each record of a batch to
/// `insert` in append order and calls `close` once, after the final drain
/// flush has completed.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Persist a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the backend accepted the record.
    /// - `Err(..)` if it did not. The flush engine reports the failure on
    ///   stderr, drops the record and moves on to the next one; there is no
    ///   retry.
    async fn insert(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Release the underlying connection.
    ///
    /// Implementations must tolerate being called more than once. Default
    /// implementation is a no-op.
    async fn close(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
