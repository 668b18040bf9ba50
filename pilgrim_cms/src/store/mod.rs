//! Remote content store adapters.
//!
//! The store holds one document per site, addressed by a fixed
//! collection/name pair. Reads return the whole document or nothing; writes
//! replace the whole document. There is no versioning or locking.

mod file;
#[cfg(feature = "http")]
mod http;
mod memory;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

pub use file::FileStore;
#[cfg(feature = "http")]
pub use http::HttpStore;
pub use memory::MemoryStore;

/// A single-document key-value store.
///
/// Futures are `Send` so the provider can hand writes to a spawned task.
pub trait ContentStore: Send + Sync + 'static {
    /// The stored document, or `None` if it was never written.
    fn get(&self) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Replace the stored document.
    fn set(&self, document: Value) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Where the document lives, for logs and status.
    fn describe(&self) -> String;
}

/// Collection/name pair addressing the site document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentKey {
    pub collection: String,
    pub name: String,
}

impl DocumentKey {
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            name: name.into(),
        }
    }
}

impl Default for DocumentKey {
    fn default() -> Self {
        Self::new("site", "content")
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.name)
    }
}

/// Store chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(FileStore),
    #[cfg(feature = "http")]
    Http(HttpStore),
}

impl ContentStore for AnyStore {
    async fn get(&self) -> Result<Option<Value>, StoreError> {
        match self {
            AnyStore::Memory(store) => store.get().await,
            AnyStore::File(store) => store.get().await,
            #[cfg(feature = "http")]
            AnyStore::Http(store) => store.get().await,
        }
    }

    async fn set(&self, document: Value) -> Result<(), StoreError> {
        match self {
            AnyStore::Memory(store) => store.set(document).await,
            AnyStore::File(store) => store.set(document).await,
            #[cfg(feature = "http")]
            AnyStore::Http(store) => store.set(document).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnyStore::Memory(store) => store.describe(),
            AnyStore::File(store) => store.describe(),
            #[cfg(feature = "http")]
            AnyStore::Http(store) => store.describe(),
        }
    }
}
