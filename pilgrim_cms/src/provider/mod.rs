//! The Content Provider: single owner of the in-memory document for a session.
//!
//! Readers take cheap [`Arc`] snapshots. Writers merge a partial document into
//! the current state, swap it in immediately, and persist the full document on
//! a spawned task. A failed write is logged and counted in [`ProviderStatus`];
//! the in-memory state is never rolled back.
//!
//! Mutations are not serialized against the store. Two quick `mutate` calls
//! apply in call order in memory, but their writes race and either may land
//! last. No concurrency token is sent.

mod status;


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::content::{Document, default_document};
use crate::error::{CmsError, CmsResult, StoreError};
use crate::merge::merge_typed;
use crate::reconcile::reconcile;
use crate::store::ContentStore;

pub use status::{ContentOrigin, Phase, ProviderStatus, StatusMirror, write_status_file};

/// A persistence write in flight.
///
/// Dropping it does not cancel the write.
#[derive(Debug)]
pub struct PendingWrite {
    /// Issue order, starting at 1.
    pub seq: u64,
    /// Patch fields that did not fit the schema and were ignored.
    pub rejected: Vec<String>,
    handle: JoinHandle<Result<(), StoreError>>,
}

impl PendingWrite {
    /// Wait for the store to acknowledge the write.
    pub async fn wait(self) -> CmsResult<()> {
        match self.handle.await {
            Ok(result) => result.map_err(CmsError::from),
            Err(e) => Err(CmsError::WriteTask(e.to_string())),
        }
    }
}

pub struct ContentProvider<S> {
    store: Arc<S>,
    state: RwLock<Arc<Document>>,
    started: AtomicBool,
    ready: AtomicBool,
    write_seq: AtomicU64,
    status: Arc<watch::Sender<ProviderStatus>>,
}

impl<S: ContentStore> ContentProvider<S> {
    pub fn new(store: S) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    pub fn with_shared_store(store: Arc<S>) -> Self {
        let (status, _) = watch::channel(ProviderStatus {
            store: store.describe(),
            ..ProviderStatus::default()
        });
        Self {
            store,
            state: RwLock::new(Arc::new(default_document().clone())),
            started: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            write_seq: AtomicU64::new(0),
            status: Arc::new(status),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the stored document once, reconcile it and publish it.
    ///
    /// Store failures do not surface here: the defaults are served and the
    /// status goes [`Phase::Degraded`]. A second call is refused.
    pub async fn load(&self) -> CmsResult<Arc<Document>> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(CmsError::AlreadyLoaded);
        }
        let source = self.store.describe();

        let remote = match self.store.get().await {
            Ok(remote) => remote,
            Err(e) => {
                warn!(store = %source, error = %e, "content store unreadable; serving defaults");
                return Ok(self.degrade(e.to_string()).await);
            }
        };

        let reconciled = match reconcile(remote.as_ref()) {
            Ok(reconciled) => reconciled,
            Err(e) => {
                warn!(store = %source, error = %e, "stored content could not be reconciled; serving defaults");
                return Ok(self.degrade(e.to_string()).await);
            }
        };

        let document = Arc::new(reconciled.document);
        *self.state.write().await = Arc::clone(&document);
        self.ready.store(true, Ordering::SeqCst);

        let origin = if reconciled.persist_defaults {
            ContentOrigin::Initialized
        } else {
            ContentOrigin::Reconciled
        };
        let report = reconciled.report;
        self.status.send_modify(|status| {
            status.phase = Phase::Ready;
            status.origin = origin;
            status.degraded_reason = None;
            status.rejected_fields = report.rejected.clone();
            status.rules_applied = report.rules_applied.iter().map(|r| r.to_string()).collect();
        });
        info!(
            store = %source,
            origin = ?origin,
            rejected = report.rejected.len(),
            rules = report.rules_applied.len(),
            "content loaded"
        );

        if reconciled.persist_defaults {
            let value = document.to_value()?;
            self.persist(value, Vec::new());
        }
        Ok(document)
    }

    async fn degrade(&self, reason: String) -> Arc<Document> {
        let document = Arc::new(default_document().clone());
        *self.state.write().await = Arc::clone(&document);
        self.ready.store(true, Ordering::SeqCst);
        self.status.send_modify(|status| {
            status.phase = Phase::Degraded;
            status.origin = ContentOrigin::Fallback;
            status.degraded_reason = Some(reason);
        });
        document
    }

    /// Current document. Before `load` completes this is the default table.
    pub async fn document(&self) -> Arc<Document> {
        Arc::clone(&*self.state.read().await)
    }

    /// Merge `patch` into the current document, swap it in, and persist.
    ///
    /// Refused with [`CmsError::Degraded`] after a load that could not read
    /// the store, since the full-document write would replace stored edits.
    pub async fn mutate(&self, patch: Value) -> CmsResult<PendingWrite> {
        if !patch.is_object() {
            return Err(CmsError::InvalidPatch(json_kind(&patch)));
        }
        if !self.ready.load(Ordering::SeqCst) {
            return Err(CmsError::NotLoaded);
        }
        if let Some(reason) = self.degraded_reason() {
            return Err(CmsError::Degraded(reason));
        }

        // No clearable paths: a null optional section is rejected.
        let (value, rejected) = {
            let mut state = self.state.write().await;
            let merged = merge_typed(&**state, &patch, &[])?;
            let value = merged.value.to_value()?;
            *state = Arc::new(merged.value);
            (value, merged.rejected)
        };
        if !rejected.is_empty() {
            warn!(paths = ?rejected, "patch fields did not fit the schema and were ignored");
        }
        Ok(self.persist(value, rejected))
    }

    /// Discard every admin edit and persist the default table.
    ///
    /// Confirmation is the caller's job.
    pub async fn reset_to_default(&self) -> CmsResult<PendingWrite> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(CmsError::NotLoaded);
        }
        let document = default_document().clone();
        let value = document.to_value()?;
        *self.state.write().await = Arc::new(document);
        self.status.send_modify(|status| {
            status.origin = ContentOrigin::Reset;
            status.rejected_fields.clear();
            status.rules_applied.clear();
        });
        info!(store = %self.store.describe(), "content reset to defaults");
        Ok(self.persist(value, Vec::new()))
    }

    /// Why `load` fell back to the defaults, while that is still the case.
    fn degraded_reason(&self) -> Option<String> {
        let status = self.status.borrow();
        (status.phase == Phase::Degraded)
            .then(|| status.degraded_reason.clone().unwrap_or_default())
    }

    pub fn status(&self) -> ProviderStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderStatus> {
        self.status.subscribe()
    }

    /// Resolve once `load` has settled on ready or degraded.
    pub async fn wait_settled(&self) -> ProviderStatus {
        let mut rx = self.subscribe();
        match rx.wait_for(ProviderStatus::is_settled).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        }
    }

    /// Wait until every issued write has finished.
    pub async fn flush(&self) -> ProviderStatus {
        let mut rx = self.subscribe();
        match rx.wait_for(|status| status.writes_in_flight() == 0).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        }
    }

    fn persist(&self, document: Value, rejected: Vec<String>) -> PendingWrite {
        let seq = self.write_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.send_modify(|status| status.writes_issued += 1);

        let store = Arc::clone(&self.store);
        let status = Arc::clone(&self.status);
        let handle = tokio::spawn(async move {
            let result = store.set(document).await;
            match &result {
                Ok(()) => {
                    debug!(seq, "content persisted");
                    status.send_modify(|status| status.writes_completed += 1);
                }
                Err(e) => {
                    warn!(seq, error = %e, "failed to persist content; keeping in-memory state");
                    let message = e.to_string();
                    status.send_modify(|status| {
                        status.writes_completed += 1;
                        status.writes_failed += 1;
                        status.last_write_error = Some(message);
                    });
                }
            }
            result
        });
        PendingWrite {
            seq,
            rejected,
            handle,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
