//! Provider health snapshot and its file mirror.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    /// The store could not be read; pages render the defaults.
    Degraded,
}

/// Where the in-memory document came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentOrigin {
    #[default]
    None,
    /// Stored content merged over the defaults.
    Reconciled,
    /// The store was empty; defaults were written back.
    Initialized,
    /// The store failed; defaults are served and nothing was written.
    Fallback,
    /// An operator reset the content to the defaults.
    Reset,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub phase: Phase,
    pub store: String,
    pub origin: ContentOrigin,
    pub degraded_reason: Option<String>,
    pub rejected_fields: Vec<String>,
    pub rules_applied: Vec<String>,
    pub writes_issued: u64,
    /// Writes that finished, successfully or not.
    pub writes_completed: u64,
    pub writes_failed: u64,
    pub last_write_error: Option<String>,
}

impl ProviderStatus {
    pub fn is_settled(&self) -> bool {
        self.phase != Phase::Loading
    }

    pub fn writes_in_flight(&self) -> u64 {
        self.writes_issued.saturating_sub(self.writes_completed)
    }
}

/// Replace the status file at `path` with `snapshot`, through a sibling
/// temp file and a rename.
pub async fn write_status_file(path: &Path, snapshot: &ProviderStatus) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create status dir {}", parent.display()))?;
    }
    let mut data = serde_json::to_vec_pretty(snapshot).context("failed to encode status")?;
    data.push(b'\n');
    let tmp = path.with_extension("status.tmp");
    fs::write(&tmp, data)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to replace status file {}", path.display()))
}

/// Live copy of the provider status on disk.
///
/// Subscribe before `load` so operators can see a store that never answers:
/// the file then stays at [`Phase::Loading`]. Repeated identical snapshots are
/// not rewritten.
#[derive(Debug)]
pub struct StatusMirror {
    path: PathBuf,
    task: JoinHandle<()>,
}

impl StatusMirror {
    pub fn spawn(mut rx: watch::Receiver<ProviderStatus>, path: PathBuf) -> Self {
        let target = path.clone();
        let task = tokio::spawn(async move {
            let mut written: Option<ProviderStatus> = None;
            loop {
                let snapshot = rx.borrow_and_update().clone();
                if written.as_ref() != Some(&snapshot) {
                    match write_status_file(&target, &snapshot).await {
                        Ok(()) => written = Some(snapshot),
                        Err(e) => warn!(path = %target.display(), "status mirror write failed: {e:#}"),
                    }
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
        Self { path, task }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop mirroring and leave `last` as the file's final content.
    pub async fn close(self, last: &ProviderStatus) -> Result<()> {
        self.task.abort();
        if let Err(e) = self.task.await
            && !e.is_cancelled()
        {
            warn!(path = %self.path.display(), error = %e, "status mirror task failed");
        }
        write_status_file(&self.path, last).await
    }
}
