//! # pilgrim_cms - content layer for a pilgrimage travel site
//!
//! Keeps one admin-editable content document in sync with a remote store and
//! makes sure whatever the store holds renders as a complete site.
//!
//! ## Pieces
//!
//! - **Default Content Table**: an embedded, typed baseline of every page,
//!   section and package. It is the schema of record.
//! - **Reconciler**: merges the stored document over the defaults, then runs
//!   an ordered table of named patch rules that repair stale shapes.
//! - **Content Provider**: owns the reconciled document for a session, serves
//!   snapshots to readers, applies admin edits optimistically and persists
//!   them in the background. Store trouble degrades to defaults and shows up
//!   in a status channel instead of reaching readers.
//! - **Router**: maps `#page?key=value` fragments to pages, including
//!   admin-defined custom pages.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pilgrim_cms::{ContentProvider, MemoryStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = ContentProvider::new(MemoryStore::new());
//!     let document = provider.load().await?;
//!     println!("{}", document.pages.home.hero.title);
//!
//!     let write = provider
//!         .mutate(json!({"pages": {"home": {"hero": {"title": "Labbaik"}}}}))
//!         .await?;
//!     write.wait().await?;
//!     Ok(())
//! }
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Public modules
// ─────────────────────────────────────────────────────────────────────────────

pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod merge;
pub mod prefs;
pub mod provider;
pub mod reconcile;
pub mod router;
pub mod store;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports for convenience
// ─────────────────────────────────────────────────────────────────────────────

pub use config::{CliOptions, Config, ResolvedParams, StoreConfig};
pub use content::{Document, default_document, default_value};
pub use error::{CmsError, CmsResult, PrefsError, StoreError};
pub use provider::{ContentProvider, PendingWrite, Phase, ProviderStatus};
pub use reconcile::{ReconcileReport, Reconciled, reconcile};
pub use router::{Resolution, Route, Router, Session, parse_fragment, resolve};
pub use store::{AnyStore, ContentStore, DocumentKey, FileStore, MemoryStore};
