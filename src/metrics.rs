use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Store-level counters for observability.
/// All counters are atomic so the store can be shared across tasks freely.
#[derive(Clone, Default)]
pub struct StoreMetrics {
    /// Records successfully read from disk
    pub records_read: Arc<AtomicU64>,
    /// Records written to disk
    pub records_written: Arc<AtomicU64>,
    /// Files skipped because they failed to parse
    pub parse_failures: Arc<AtomicU64>,
    /// Records deleted
    pub records_deleted: Arc<AtomicU64>,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_read(&self, count: u64) {
        self.records_read.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.records_deleted.fetch_add(1, Ordering::Relaxed);
    }
}
