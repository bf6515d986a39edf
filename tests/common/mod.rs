#![allow(dead_code)]

use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlite_log_sink::{LogRecord, LogStore, SinkConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Insert(LogRecord),
    Close,
}

/// In-memory store recording every successful insert and close, in order.
#[derive(Default)]
pub struct RecordingStore {
    events: Mutex<Vec<StoreEvent>>,
    failed_attempts: Mutex<Vec<String>>,
    fail_on: Vec<String>,
    insert_delay: Option<Duration>,
}

impl RecordingStore {
    /// Reject inserts whose text equals one of `texts`.
    pub fn failing_on(texts: &[&str]) -> Self {
        RecordingStore {
            fail_on: texts.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Sleep for `delay` inside every insert.
    pub fn slow(delay: Duration) -> Self {
        RecordingStore {
            insert_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().clone()
    }

    /// Texts of the inserted records, in insert order.
    pub fn texts(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                StoreEvent::Insert(r) => Some(r.text.clone()),
                StoreEvent::Close => None,
            })
            .collect()
    }

    pub fn closes(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, StoreEvent::Close))
            .count()
    }

    pub fn failed_attempts(&self) -> Vec<String> {
        self.failed_attempts.lock().clone()
    }
}

#[async_trait]
impl LogStore for RecordingStore {
    async fn insert(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(delay) = self.insert_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on.iter().any(|t| t == &record.text) {
            self.failed_attempts.lock().push(record.text.clone());
            return Err(format!("rejected {}", record.text).into());
        }
        self.events.lock().push(StoreEvent::Insert(record.clone()));
        Ok(())
    }

    async fn close(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.events.lock().push(StoreEvent::Close);
        Ok(())
    }
}

pub fn quiet_config(location: &str, interval: Duration) -> SinkConfig {
    SinkConfig::new(location, interval).with_echo_console(false)
}
