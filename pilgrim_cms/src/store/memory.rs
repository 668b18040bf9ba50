use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde_json::Value;
use tokio::sync::Mutex;

use super::ContentStore;
use crate::error::StoreError;

/// In-process store. Clones share the same document.
///
/// Reads and writes can be made to fail, which is how the degraded and
/// write-failure paths are exercised.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    document: Mutex<Option<Value>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Value) -> Self {
        Self {
            inner: Arc::new(Inner {
                document: Mutex::new(Some(document)),
                ..Inner::default()
            }),
        }
    }

    /// What a reader of the remote document would see right now.
    pub async fn snapshot(&self) -> Option<Value> {
        self.inner.document.lock().await.clone()
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl ContentStore for MemoryStore {
    async fn get(&self) -> Result<Option<Value>, StoreError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store reads disabled".into()));
        }
        Ok(self.inner.document.lock().await.clone())
    }

    async fn set(&self, document: Value) -> Result<(), StoreError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store writes disabled".into()));
        }
        *self.inner.document.lock().await = Some(document);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::with_document(json!({"v": 1}));
        let clone = store.clone();
        clone.set(json!({"v": 2})).await.unwrap();
        assert_eq!(store.snapshot().await, Some(json!({"v": 2})));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn seeded_document_is_readable_without_writes() {
        let store = MemoryStore::with_document(json!({"site": {"name": "Seeded"}}));
        assert_eq!(
            store.get().await.unwrap(),
            Some(json!({"site": {"name": "Seeded"}}))
        );
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn failure_switches() {
        let store = MemoryStore::new();
        store.set_fail_reads(true);
        assert!(matches!(store.get().await, Err(StoreError::Unavailable(_))));
        store.set_fail_writes(true);
        assert!(store.set(json!({})).await.is_err());
        assert_eq!(store.write_count(), 0);
    }
}
