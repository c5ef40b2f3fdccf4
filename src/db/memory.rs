//! In-process ledger store.
//!
//! Behaves like a remote key-value area: every read and write can be given an
//! artificial round-trip latency, and failures can be injected. The tracking
//! tests use it to reproduce storage races deterministically.

use crate::db::storage::{LedgerError, LedgerStore};
use crate::libs::accumulator::LedgerRecord;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct MemoryInner {
    record: Mutex<Option<LedgerRecord>>,
    latency: Mutex<Duration>,
    failures_left: AtomicUsize,
    writes: AtomicUsize,
}

/// Shared in-memory store; clones see the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: LedgerRecord) -> Self {
        let store = Self::new();
        *store.inner.record.lock() = Some(record);
        store
    }

    /// Delay applied to each read and write.
    pub fn set_latency(&self, latency: Duration) {
        *self.inner.latency.lock() = latency;
    }

    /// Makes the next `count` operations fail.
    pub fn fail_next(&self, count: usize) {
        self.inner.failures_left.store(count, Ordering::SeqCst);
    }

    /// Current stored record, without latency.
    pub fn peek(&self) -> Option<LedgerRecord> {
        self.inner.record.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> Result<(), LedgerError> {
        let injected = self
            .inner
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if injected {
            return Err(LedgerError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }

    async fn round_trip(&self) {
        let latency = *self.inner.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

impl LedgerStore for MemoryStore {
    async fn read(&self) -> Result<Option<LedgerRecord>, LedgerError> {
        self.take_failure()?;
        // The value is captured before the simulated round trip completes, so
        // a concurrent writer can land in between.
        let snapshot = self.peek();
        self.round_trip().await;
        Ok(snapshot)
    }

    async fn write(&self, record: &LedgerRecord) -> Result<(), LedgerError> {
        self.take_failure()?;
        let record = record.clone();
        self.round_trip().await;
        *self.inner.record.lock() = Some(record);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
