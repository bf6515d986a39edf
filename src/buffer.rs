use parking_lot::Mutex;

use crate::record::LogRecord;

/// Default cap on records held between two flushes.
pub const DEFAULT_MAX_BUFFERED: usize = 100_000;

/// Append-only queue of records waiting for the next flush.
///
/// The lock is only held while pushing a record or swapping the whole
/// vector out, never while a batch is being written to storage.
#[derive(Debug)]
pub struct EntryBuffer {
    entries: Mutex<Vec<LogRecord>>,
    max_len: usize,
}

impl EntryBuffer {
    /// Create a buffer holding at most `max_len` records (minimum 1).
    pub fn new(max_len: usize) -> Self {
        EntryBuffer {
            entries: Mutex::new(Vec::new()),
            max_len: max_len.max(1),
        }
    }

    /// Push a record to the tail.
    ///
    /// Returns `false` when the buffer is full; the record is dropped and
    /// whatever is already buffered is kept.
    pub fn append(&self, record: LogRecord) -> bool {
        let mut entries = self.entries.lock();
        if entries.len() >= self.max_len {
            return false;
        }
        entries.push(record);
        true
    }

    /// Detach the current contents as a batch and leave the buffer empty.
    pub fn take_and_clear(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity_limit(&self) -> usize {
        self.max_len
    }
}

impl Default for EntryBuffer {
    fn default() -> Self {
        EntryBuffer::new(DEFAULT_MAX_BUFFERED)
    }
}
