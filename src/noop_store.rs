use crate::record::LogRecord;
use crate::store::LogStore;
use async_trait::async_trait;
use std::error::Error;

/// Accepts every record and keeps none of them.
///
/// Buffering, ticks and the drain still run in full, so pairing a sink with
/// this store shows what logging costs before any database work. The load
/// demos use it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopStore;

#[async_trait]
impl LogStore for NoopStore {
    async fn insert(&self, _record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
