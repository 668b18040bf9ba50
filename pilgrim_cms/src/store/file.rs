use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::fs;
use tracing::debug;

use super::{ContentStore, DocumentKey};
use crate::error::StoreError;

/// Document kept as `<root>/<collection>/<name>.json`.
///
/// Writes go to a temporary file that is renamed over the target, so a reader
/// never sees a half-written document.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    key: DocumentKey,
    tmp_seq: Arc<AtomicU64>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, key: DocumentKey) -> Self {
        Self {
            root: root.into(),
            key,
            tmp_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root
            .join(&self.key.collection)
            .join(format!("{}.json", self.key.name))
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            target: path.display().to_string(),
            source,
        }
    }
}

impl ContentStore for FileStore {
    async fn get(&self) -> Result<Option<Value>, StoreError> {
        let path = self.path();
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no stored document");
                return Ok(None);
            }
            Err(e) => return Err(Self::io_error(&path, e)),
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                target: path.display().to_string(),
                source,
            })
    }

    async fn set(&self, document: Value) -> Result<(), StoreError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::io_error(parent, e))?;
        }
        let seq = self.tmp_seq.fetch_add(1, Ordering::SeqCst);
        let tmp = path.with_extension(format!("json.{seq}.tmp"));
        let data = serde_json::to_vec_pretty(&document).map_err(|source| StoreError::Decode {
            target: path.display().to_string(),
            source,
        })?;
        fs::write(&tmp, data)
            .await
            .map_err(|e| Self::io_error(&tmp, e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| Self::io_error(&path, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path().display())
    }
}
